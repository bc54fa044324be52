//! Error types for account flows

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Request rejected with status {code}: {message}")]
    Rejected { code: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Missing access token for generated password update")]
    MissingAccessToken,
}

impl AccountError {
    /// Create a rejection carrying a server status code
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        AccountError::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Server status code, when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AccountError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AccountError>;
