//! Error types
//!
//! Runtime physics never fails; only configuration and level loading can.

use std::fmt;

/// Level generation failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    /// Generation produced no targets, which would read as an instant win
    EmptyLayout { level: u32 },
    /// A spawn region has no area or non-finite bounds
    InvalidRegion { name: &'static str },
    /// The level counter cannot go any higher
    LevelLimit { level: u32 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayout { level } => {
                write!(f, "level {level} layout has no targets")
            }
            Self::InvalidRegion { name } => {
                write!(f, "spawn region `{name}` is empty or not finite")
            }
            Self::LevelLimit { level } => {
                write!(f, "no level after {level}")
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Tuning load/validation failure
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read tuning file: {e}"),
            Self::Parse(e) => write!(f, "malformed tuning json: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
