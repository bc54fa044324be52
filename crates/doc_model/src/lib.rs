//! Document Model - Articles and styled text
//!
//! This crate provides the content side of the article exporter: the
//! immutable [`ArticleDocument`], [`AttributedText`] with styled runs, and
//! the markdown-subset parser that turns an article body into styled text.

mod article;
mod attributed;
mod error;
mod markdown;
mod style;

pub use article::*;
pub use attributed::*;
pub use error::*;
pub use markdown::*;
pub use style::*;
