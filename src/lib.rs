//! Rotor cipher machine simulator.
//!
//! Simulates an Enigma-style machine: a catalog of interchangeable rotors,
//! a plugboard, and a per-message setting. Each keypress steps the rotors
//! (with the historical double-stepping anomaly) and then sends the signal
//! through plugboard, rotors, reflector, rotors and plugboard again.
//! Encoding and decoding are the same operation.
//!
//! This is a reference model of the mechanism, not a secure cipher.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol <-> index)
//!     ↓ shared via Arc
//! Permutation  (cycle notation, forward/inverse tables)
//!     ↓ owned by
//! Rotor        (reflector | fixed | moving, with a setting) in a RotorArena
//!     ↓ slots hold RotorIds
//! Machine      (stepping + signal path)
//!     ↑ built and set up by
//! config / processor  (configuration text, setting lines, message streams)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt a message with the naval rotor set:
//!
//! ```
//! use enigma::{MachineConfig, Setting};
//!
//! let config: MachineConfig = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
//!     I    MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!     III  MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!     IV   MJ (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//!     Beta N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!     B    R  (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)"
//!     .parse()
//!     .unwrap();
//! let setting: Setting = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)".parse().unwrap();
//!
//! let mut encoder = config.build_machine().unwrap();
//! setting.apply(&mut encoder).unwrap();
//! let cipher = encoder.convert_message("FROM HIS SHOULDER HIAWATHA").unwrap();
//! assert_eq!(cipher, "QVPQSOKOILPUBKJZPISFXDW");
//!
//! let mut decoder = config.build_machine().unwrap();
//! setting.apply(&mut decoder).unwrap();
//! assert_eq!(decoder.convert_message(&cipher).unwrap(), "FROMHISSHOULDERHIAWATHA");
//! ```
//!
//! Drive the stepping directly:
//!
//! ```
//! use std::sync::Arc;
//! use enigma::{Alphabet, Machine, Permutation, Rotor};
//!
//! let alpha = Arc::new(Alphabet::new("ABC").unwrap());
//! let wiring = |c: &str| Permutation::new(c, alpha.clone()).unwrap();
//! let rotors = vec![
//!     Rotor::reflector("R", wiring("(AB)")),
//!     Rotor::moving("S", wiring("(ABC)"), "C").unwrap(),
//!     Rotor::moving("F", wiring("(ABC)"), "C").unwrap(),
//! ];
//! let mut machine = Machine::new(alpha.clone(), 3, 2, rotors).unwrap();
//! machine.insert_rotors(&["R", "S", "F"]).unwrap();
//! machine.advance_rotors();
//! assert_eq!(machine.settings(), vec![0, 0, 1]);
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod processor;
pub mod rotor;
pub mod utils;

pub use alphabet::Alphabet;
pub use config::{MachineConfig, RotorDescriptor, RotorType, Setting};
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use processor::{process, process_with, ProcessError};
pub use rotor::{Rotor, RotorArena, RotorId, RotorKind};
