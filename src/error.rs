use crate::types::{Side, Square};
use std::error::Error;
use std::fmt;

// --- Custom Error Types ---

/// Rejections from [`Board::from_pieces`](crate::board::Board::from_pieces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    OutOfBounds(Square),
    Occupied(Square),
    DuplicateGeneral(Side),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds(sq) => write!(f, "Square {} is off the board", sq),
            BoardError::Occupied(sq) => write!(f, "Square {} already holds a piece", sq),
            BoardError::DuplicateGeneral(side) => write!(f, "{} already has a General on the board", side),
        }
    }
}

impl Error for BoardError {}

#[derive(Debug)]
pub enum ConfigError {
    Serialization(serde_json::Error),
    InvalidDuration(&'static str), // Names the offending field
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Serialization(e) => write!(f, "Config parse error: {}", e),
            ConfigError::InvalidDuration(field) => write!(f, "Duration '{}' must be finite and positive", field),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Serialization(e) => Some(e),
            ConfigError::InvalidDuration(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self { ConfigError::Serialization(e) }
}
