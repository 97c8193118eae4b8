//! Machine configuration and per-message settings.
//!
//! Configuration text is a whitespace-separated token stream:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
//!  I     MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta  N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B     R    (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!             (RX) (SZ) (TV)
//! ```
//!
//! The header gives the alphabet, the slot count and the pawl count. Each
//! rotor is a name, a type tag (`M` moving, `N` fixed, `R` reflector)
//! followed directly by the notch symbols of a moving rotor, and its
//! cycles. Any token starting with `(` continues the current rotor, so
//! cycles may wrap onto the next line.
//!
//! A setting line looks like `* B Beta III IV I AXLE (HQ) (EX) (IP)`: the
//! rotor names, the initial positions, then optional plugboard cycles.

use std::str::FromStr;
use std::sync::Arc;

use log::debug;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Variant tag of a rotor description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotorType {
    Moving,
    Fixed,
    Reflector,
}

/// Everything needed to build one catalog rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDescriptor {
    pub name: String,
    pub kind: RotorType,
    /// Notch symbols; empty unless `kind` is [`RotorType::Moving`].
    pub notches: String,
    /// Wiring in cycle notation.
    pub cycles: String,
}

impl RotorDescriptor {
    /// Builds the rotor over `alphabet`.
    ///
    /// # Errors
    /// Propagates cycle and notch errors from [`Permutation::new`] and
    /// [`Rotor::moving`].
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor, EnigmaError> {
        let perm = Permutation::new(&self.cycles, alphabet.clone())?;
        match self.kind {
            RotorType::Moving => Rotor::moving(&self.name, perm, &self.notches),
            RotorType::Fixed => Ok(Rotor::fixed(&self.name, perm)),
            RotorType::Reflector => Ok(Rotor::reflector(&self.name, perm)),
        }
    }
}

/// Parsed configuration: alphabet, slot geometry and rotor catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub alphabet: Arc<Alphabet>,
    pub num_rotors: usize,
    pub num_pawls: usize,
    pub rotors: Vec<RotorDescriptor>,
}

impl MachineConfig {
    /// Builds a machine with every described rotor in its catalog.
    ///
    /// # Errors
    /// Propagates rotor construction errors and [`Machine::new`] errors.
    pub fn build_machine(&self) -> Result<Machine, EnigmaError> {
        let rotors = self
            .rotors
            .iter()
            .map(|desc| desc.build(&self.alphabet))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "building machine: {} slots, {} pawls, {} rotors in catalog",
            self.num_rotors,
            self.num_pawls,
            rotors.len()
        );
        Machine::new(self.alphabet.clone(), self.num_rotors, self.num_pawls, rotors)
    }
}

impl FromStr for MachineConfig {
    type Err = EnigmaError;

    /// Parses configuration text.
    ///
    /// # Errors
    /// - [`EnigmaError::ConfigTruncated`] if the header is incomplete.
    /// - [`EnigmaError::BadRotorDescription`] for non-numeric counts, unknown
    ///   type tags, missing cycles, or notches on a non-moving rotor.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet = Alphabet::new(tokens.next().ok_or(EnigmaError::ConfigTruncated)?)?;
        let num_rotors = parse_count(tokens.next())?;
        let num_pawls = parse_count(tokens.next())?;

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            let tag = tokens.next().ok_or_else(|| {
                EnigmaError::BadRotorDescription(format!("rotor {} has no type", name))
            })?;
            let mut cycles = Vec::new();
            while let Some(cycle) = tokens.next_if(|tok| tok.starts_with('(')) {
                cycles.push(cycle);
            }
            rotors.push(describe_rotor(name, tag, &cycles)?);
        }

        Ok(MachineConfig {
            alphabet: Arc::new(alphabet),
            num_rotors,
            num_pawls,
            rotors,
        })
    }
}

fn parse_count(token: Option<&str>) -> Result<usize, EnigmaError> {
    let token = token.ok_or(EnigmaError::ConfigTruncated)?;
    token
        .parse()
        .map_err(|_| EnigmaError::BadRotorDescription(format!("bad count '{}'", token)))
}

fn describe_rotor(name: &str, tag: &str, cycles: &[&str]) -> Result<RotorDescriptor, EnigmaError> {
    let mut chars = tag.chars();
    let kind = match chars.next() {
        Some('M') => RotorType::Moving,
        Some('N') => RotorType::Fixed,
        Some('R') => RotorType::Reflector,
        _ => {
            return Err(EnigmaError::BadRotorDescription(format!(
                "rotor {} has unknown type '{}'",
                name, tag
            )))
        }
    };
    let notches: String = chars.collect();
    if kind != RotorType::Moving && !notches.is_empty() {
        return Err(EnigmaError::BadRotorDescription(format!(
            "non-moving rotor {} has notches",
            name
        )));
    }
    if cycles.is_empty() {
        return Err(EnigmaError::BadRotorDescription(format!(
            "rotor {} has no cycles",
            name
        )));
    }
    Ok(RotorDescriptor {
        name: name.to_string(),
        kind,
        notches,
        cycles: cycles.join(" "),
    })
}

/// A parsed setting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub rotors: Vec<String>,
    pub positions: String,
    pub plugboard: String,
}

impl Setting {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// - [`EnigmaError::MissingSetting`] if `line` does not start with `*`.
    /// - [`EnigmaError::BadSetting`] if rotor names or positions are missing.
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, EnigmaError> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("*") {
            return Err(EnigmaError::MissingSetting);
        }
        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(String::from).collect();
        if rotors.len() != num_rotors {
            return Err(EnigmaError::BadSetting(format!(
                "expected {} rotor names in \"{}\"",
                num_rotors, line
            )));
        }
        let positions = tokens
            .next()
            .ok_or_else(|| EnigmaError::BadSetting(format!("no positions in \"{}\"", line)))?
            .to_string();
        let plugboard = tokens.collect::<Vec<_>>().join(" ");
        Ok(Setting {
            rotors,
            positions,
            plugboard,
        })
    }

    /// Inserts, positions and plugs `machine` according to this setting.
    ///
    /// Every check runs before the machine is touched, so a rejected setting
    /// leaves slots, rotor settings and plugboard as they were.
    ///
    /// # Errors
    /// - [`EnigmaError::WrongRotorCount`] if the names do not fill the slots.
    /// - [`EnigmaError::DuplicateRotor`] if a rotor is named twice.
    /// - [`EnigmaError::FirstRotorNotReflector`] if the first rotor is not a
    ///   reflector.
    /// - [`EnigmaError::SettingLength`], [`EnigmaError::SymbolNotFound`] or
    ///   [`EnigmaError::ReflectorPosition`] for unusable positions.
    /// - Any error of [`Machine::insert_rotors`] or [`Permutation::new`].
    pub fn apply(&self, machine: &mut Machine) -> Result<(), EnigmaError> {
        if self.rotors.len() != machine.num_rotors() {
            return Err(EnigmaError::WrongRotorCount {
                expected: machine.num_rotors(),
                actual: self.rotors.len(),
            });
        }
        for (i, name) in self.rotors.iter().enumerate() {
            if self.rotors[..i].contains(name) {
                return Err(EnigmaError::DuplicateRotor(name.clone()));
            }
        }

        let catalog = machine.catalog();
        let lookup = |name: &str| catalog.find(name).and_then(|id| catalog.get(id));
        if let Some(first) = self.rotors.first() {
            if lookup(first.as_str()).is_some_and(|rotor| !rotor.reflecting()) {
                return Err(EnigmaError::FirstRotorNotReflector(first.clone()));
            }
        }

        let expected = self.rotors.len().saturating_sub(1);
        let actual = self.positions.chars().count();
        if actual != expected {
            return Err(EnigmaError::SettingLength { expected, actual });
        }
        let alphabet = machine.alphabet().clone();
        let positions = self
            .positions
            .chars()
            .map(|ch| alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;
        for (name, &posn) in self.rotors.iter().skip(1).zip(&positions) {
            if posn != 0 && lookup(name.as_str()).is_some_and(Rotor::reflecting) {
                return Err(EnigmaError::ReflectorPosition(posn));
            }
        }
        let plugboard = Permutation::new(&self.plugboard, alphabet)?;

        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.positions)?;
        machine.set_plugboard(plugboard);
        Ok(())
    }
}

impl FromStr for Setting {
    type Err = EnigmaError;

    /// Parses a setting line, taking every name-like token before the
    /// positions as a rotor name. Prefer [`Setting::parse`] when the slot
    /// count is known.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let names = tokens
            .iter()
            .skip(1)
            .take_while(|tok| !tok.starts_with('('))
            .count();
        if names < 2 {
            return Err(EnigmaError::BadSetting(format!(
                "no rotors or positions in \"{}\"",
                line
            )));
        }
        Self::parse(line, names - 1)
    }
}
