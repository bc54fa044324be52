//! Error types for export and storage operations

use crate::pdf::PdfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure to assemble an article PDF. Nothing is produced when this is
/// returned.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to lay out article: {0}")]
    Layout(#[from] layout_engine::LayoutError),

    #[error("Failed to write PDF: {0}")]
    Pdf(#[from] PdfError),

    #[error("Render job stopped before finishing: {0}")]
    Interrupted(String),
}

/// Why a header image could not be fetched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
