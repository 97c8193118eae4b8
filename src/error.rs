//! Error types for the enigma library.

use thiserror::Error;

/// Errors produced by the enigma library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Alphabet position outside `0..size`.
    #[error("Index {index} is out of range for an alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// Symbol is not part of the alphabet.
    #[error("Symbol '{0}' is not in the alphabet")]
    SymbolNotFound(char),
    /// Alphabet built from an empty symbol string.
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// Cycle notation could not be parsed.
    #[error("Malformed cycle notation: {0}")]
    MalformedCycles(String),
    /// A symbol appears twice inside a single cycle.
    #[error("Symbol '{0}' is repeated within a cycle")]
    RepeatedCycleSymbol(char),
    /// Some requested rotor names are not in the catalog.
    #[error("Rotors not found or misnamed: requested {requested}, found {found}")]
    RotorsNotFound { requested: usize, found: usize },
    /// A rotor name was requested twice, or the catalog holds it twice.
    #[error("Duplicate rotor '{0}'")]
    DuplicateRotor(String),
    /// Number of rotor names differs from the number of slots.
    #[error("Expected {expected} rotors, got {actual}")]
    WrongRotorCount { expected: usize, actual: usize },
    /// Setting string length differs from the number of non-reflector slots.
    #[error("Settings string wrong length: expected {expected}, got {actual}")]
    SettingLength { expected: usize, actual: usize },
    /// Attempt to turn a reflector away from position 0.
    #[error("Reflector has only one position, cannot set to {0}")]
    ReflectorPosition(usize),
    /// Slot and pawl counts that cannot describe a machine.
    #[error("Invalid machine geometry: {rotors} rotor slots with {pawls} pawls")]
    InvalidGeometry { rotors: usize, pawls: usize },
    /// Conversion requested before any rotors were inserted.
    #[error("No rotors inserted")]
    NoRotorsInserted,
    /// Configuration text ended before the header was complete.
    #[error("Configuration file truncated")]
    ConfigTruncated,
    /// Rotor description line in the configuration could not be read.
    #[error("Bad rotor description: {0}")]
    BadRotorDescription(String),
    /// Input does not begin with a setting line.
    #[error("Input does not start with a setting")]
    MissingSetting,
    /// Setting line has the wrong shape.
    #[error("Bad setting line: {0}")]
    BadSetting(String),
    /// First rotor of a setting is not a reflector.
    #[error("First rotor '{0}' is not a reflector")]
    FirstRotorNotReflector(String),
}
