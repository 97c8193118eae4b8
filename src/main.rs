//! `enigma`: encrypts and decrypts message streams with a rotor machine.
//!
//! **Usage:**
//! ```text
//! enigma [-v...] <CONFIG> [INPUT [OUTPUT]]
//! ```
//!
//! Input defaults to standard input and output to standard output. Each
//! `-v` raises the log level; at `-vvv` every keypress is traced.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};

use enigma::{process, MachineConfig};

/// Rotor cipher machine simulator.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Machine configuration file.
    config: PathBuf,

    /// File of settings and messages (default: standard input).
    input: Option<PathBuf>,

    /// File for processed messages (default: standard output).
    output: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let config: MachineConfig = text
        .parse()
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;
    info!(
        "loaded {} rotors from {}",
        config.rotors.len(),
        cli.config.display()
    );

    let input: Box<dyn io::BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn io::Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    process(&config, input, output)?;
    Ok(())
}
