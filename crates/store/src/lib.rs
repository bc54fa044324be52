//! Store - Article export and settings
//!
//! This crate turns articles into shareable PDF files, runs exports as
//! background render jobs, manages temporary export files, and holds the
//! application settings tree.

mod error;
mod export;
mod render_job;
mod settings;
pub mod pdf;

pub use error::*;
pub use export::*;
pub use render_job::*;
pub use settings::*;
