//! Message-stream driver.
//!
//! Reads setting lines and messages from a text stream, converts every
//! message with the machine as currently set, and writes the results in
//! groups of five symbols.

use std::io::{self, BufRead, Write};

use log::info;
use thiserror::Error;

use crate::config::{MachineConfig, Setting};
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::utils::grouping::group_symbols;

/// Symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Errors produced while processing a message stream.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Enigma(#[from] EnigmaError),
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Builds a machine from `config` and runs it over `input`.
///
/// # Errors
/// Returns the first configuration, setting, message or I/O error.
pub fn process<R: BufRead, W: Write>(
    config: &MachineConfig,
    input: R,
    output: W,
) -> Result<(), ProcessError> {
    let mut machine = config.build_machine()?;
    process_with(&mut machine, input, output)
}

/// Runs `machine` over `input`, writing converted messages to `output`.
///
/// The first non-blank line must be a setting (`* ...`). Later setting
/// lines re-configure the same machine. Blank lines are copied through.
///
/// # Errors
/// - [`EnigmaError::MissingSetting`] if a message precedes every setting.
/// - Any error from [`Setting::parse`], [`Setting::apply`] or
///   [`Machine::convert_message`].
/// - [`ProcessError::Io`] on read or write failure.
pub fn process_with<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    mut output: W,
) -> Result<(), ProcessError> {
    let mut configured = false;
    let mut pending_blanks = 0usize;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.starts_with('*') {
            let setting = Setting::parse(trimmed, machine.num_rotors())?;
            setting.apply(machine)?;
            info!("applied setting: {}", trimmed);
            configured = true;
            continue;
        }
        if trimmed.is_empty() {
            if configured {
                pending_blanks += 1;
            }
            continue;
        }
        if !configured {
            return Err(EnigmaError::MissingSetting.into());
        }

        for _ in 0..pending_blanks {
            writeln!(output)?;
        }
        pending_blanks = 0;

        let converted = machine.convert_message(trimmed)?;
        writeln!(output, "{}", group_symbols(&converted, GROUP_SIZE))?;
    }

    output.flush()?;
    Ok(())
}
