//! PDF Export Public API

use super::document::DocumentInfo;
use super::images::ImageData;
use super::options::PdfExportOptions;
use super::writer::{PdfDocumentWriter, Result};
use layout_engine::RenderedPage;
use std::io::Write;

/// Export rendered pages to PDF bytes in memory
///
/// `info` fills the document information dictionary; `image` is the
/// decoded header image, drawn wherever a page places it.
///
/// # Example
///
/// ```ignore
/// use store::pdf::{export_pdf_bytes, DocumentInfo, PdfExportOptions};
///
/// let info = DocumentInfo::new("Sleep well", "Sama Coachee");
/// let bytes = export_pdf_bytes(&article.pages, None, info, &PdfExportOptions::default())?;
/// ```
pub fn export_pdf_bytes(
    pages: &[RenderedPage],
    image: Option<&ImageData>,
    info: DocumentInfo,
    options: &PdfExportOptions,
) -> Result<Vec<u8>> {
    document_writer(info, options).write_to_vec(pages, image)
}

/// Export rendered pages to any writer
pub fn export_pdf_to_writer<W: Write>(
    pages: &[RenderedPage],
    image: Option<&ImageData>,
    info: DocumentInfo,
    options: &PdfExportOptions,
    writer: W,
) -> Result<W> {
    document_writer(info, options).write(pages, image, writer)
}

fn document_writer(info: DocumentInfo, options: &PdfExportOptions) -> PdfDocumentWriter {
    PdfDocumentWriter::new(info)
        .with_compression(options.compress)
        .with_links(options.include_links)
}
