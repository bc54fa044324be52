//! Error types for text engine

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("Invalid character range {first}..={last}")]
    InvalidCharRange { first: u8, last: u8 },
}

pub type Result<T> = std::result::Result<T, TextError>;
