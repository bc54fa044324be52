//! Layout Engine - Line breaking and article pagination
//!
//! This crate turns styled text into positioned lines and flows articles
//! onto fixed-size pages ready for rendering.

mod error;
mod framesetter;
mod page;
mod paginator;
mod style;

pub use error::*;
pub use framesetter::*;
pub use page::*;
pub use paginator::*;
pub use style::*;
