//! Text Engine - Fonts and metrics
//!
//! This crate describes the fonts the article exporter draws with and
//! measures text for layout.
//!
//! # Modules
//!
//! - `font`: Font faces, specs and the type scale
//! - `metrics`: Standard-face advance widths and the [`TextMeasurer`] seam

mod error;
mod font;
mod metrics;

pub use error::*;
pub use font::*;
pub use metrics::*;
