//! PDF Export Module
//!
//! Writes paginated articles ([`layout_engine::RenderedPage`]) as PDF files.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (Dictionary, Array, Stream, Reference)
//! - `document`: Catalog, page tree, pages, link annotations, document info
//! - `content`: Content stream generation (text, fills, images)
//! - `fonts`: Standard Helvetica faces and WinAnsi text encoding
//! - `images`: JPEG and PNG image XObjects
//! - `renderer`: Converts rendered pages to content streams
//! - `writer`: File structure, cross-reference table, compression
//! - `options`: PDF export configuration
//! - `api`: Public API for PDF export

mod api;
mod content;
mod document;
mod fonts;
mod images;
mod objects;
mod options;
mod renderer;
mod writer;

pub use api::*;
pub use document::{pdf_date, DocumentInfo, PDF_VERSION};
pub use fonts::{encode_win_ansi, win_ansi_code};
pub use images::{ColorSpace, ImageData, ImageError, ImageFilter};
pub use options::*;
pub use writer::{PdfDocumentWriter, PdfError};
