//! PDF Writer
//!
//! File structure (header, body, cross-reference table, trailer), object
//! numbering and stream compression, plus the document writer that lays
//! paginated articles out as PDF objects.

use super::document::{
    create_catalog, create_link_annotation, create_pages, DocumentInfo, MediaBox, PdfPage,
    PDF_VERSION,
};
use super::fonts::standard_font_dict;
use super::images::ImageData;
use super::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use super::renderer::{PdfRenderer, RenderedContent, IMAGE_RESOURCE};
use layout_engine::RenderedPage;
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// An object in the PDF file with its byte offset
#[derive(Debug, Clone, Copy)]
struct ObjectEntry {
    obj_num: u32,
    offset: u64,
}

/// Low-level PDF file writer
pub struct PdfWriter<W: Write> {
    writer: W,
    /// Current byte position
    position: u64,
    objects: Vec<ObjectEntry>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            objects: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Reserve the next object number
    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", PDF_VERSION))?;
        // binary marker
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    /// Write an indirect object
    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.objects.push(ObjectEntry {
            obj_num,
            offset: self.position,
        });

        self.write_str(&format!("{} 0 obj\n", obj_num))?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_str("\nendobj\n")?;
        Ok(())
    }

    /// Write a stream object, compressing it unless it is already encoded
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.compressed {
            stream = compress_stream(stream)?;
        }
        stream
            .dict
            .insert("Length", PdfObject::int(stream.data.len() as i64));

        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    /// Write the cross-reference table and trailer
    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: Option<u32>) -> Result<()> {
        let xref_offset = self.position;

        let mut entries = self.objects.clone();
        entries.sort_by_key(|e| e.obj_num);
        let size = self.next_obj_num;

        self.write_str("xref\n")?;
        self.write_str(&format!("0 {}\n", size))?;
        self.write_str("0000000000 65535 f \n")?;

        let mut expected_num = 1u32;
        for entry in entries {
            // allocated but never written
            while expected_num < entry.obj_num {
                self.write_str("0000000000 65535 f \n")?;
                expected_num += 1;
            }
            self.write_str(&format!("{:010} 00000 n \n", entry.offset))?;
            expected_num = entry.obj_num + 1;
        }
        while expected_num < size {
            self.write_str("0000000000 65535 f \n")?;
            expected_num += 1;
        }

        let mut trailer = PdfDictionary::new()
            .with("Size", PdfObject::int(size as i64))
            .with("Root", PdfObject::reference(catalog_ref));
        if let Some(info) = info_ref {
            trailer.insert("Info", PdfObject::reference(info));
        }

        self.write_str("trailer\n")?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&PdfObject::Dictionary(trailer))?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))?;

        Ok(())
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Flate-compress stream data
fn compress_stream(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&stream.data)?;
    stream.data = encoder.finish()?;
    stream.compressed = true;
    stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
    Ok(stream)
}

/// Writes rendered pages as a complete PDF document
pub struct PdfDocumentWriter {
    info: DocumentInfo,
    compress: bool,
    include_links: bool,
}

impl PdfDocumentWriter {
    pub fn new(info: DocumentInfo) -> Self {
        Self {
            info,
            compress: true,
            include_links: true,
        }
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_links(mut self, include_links: bool) -> Self {
        self.include_links = include_links;
        self
    }

    /// Write `pages` to `writer`. `image` is drawn wherever a page places
    /// the header image.
    pub fn write<W: Write>(
        &self,
        pages: &[RenderedPage],
        image: Option<&ImageData>,
        writer: W,
    ) -> Result<W> {
        if pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let mut pdf = PdfWriter::new(writer);
        pdf.set_compression(self.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        // Render first so the fonts in use are known
        let mut renderer = PdfRenderer::new();
        let rendered: Vec<RenderedContent> = pages
            .iter()
            .map(|page| renderer.render_page(page, image.is_some()))
            .collect();

        let font_refs: Vec<_> = renderer
            .font_registry()
            .fonts()
            .iter()
            .map(|font| (font.clone(), pdf.allocate_object()))
            .collect();

        let image_ref = match image {
            Some(_) if rendered.iter().any(|page| page.draws_image) => {
                Some(pdf.allocate_object())
            }
            _ => None,
        };

        let mut page_refs = Vec::with_capacity(pages.len());
        for (page, content) in pages.iter().zip(rendered) {
            let page_ref = pdf.allocate_object();
            let content_ref = pdf.allocate_object();
            page_refs.push(page_ref);

            let mut pdf_page = PdfPage::new(
                MediaBox::new(page.width as f64, page.height as f64),
                content_ref,
            );
            for (font, font_ref) in &font_refs {
                pdf_page.add_font(font.name.clone(), *font_ref);
            }
            if let (true, Some(image_ref)) = (content.draws_image, image_ref) {
                pdf_page.add_image(IMAGE_RESOURCE, image_ref);
            }
            if self.include_links {
                for link in &content.links {
                    let annot_ref = pdf.allocate_object();
                    let annot = create_link_annotation(link.rect, &link.url);
                    pdf.write_object(annot_ref, &PdfObject::Dictionary(annot))?;
                    pdf_page.add_annotation(annot_ref);
                }
            }

            pdf.write_object(page_ref, &PdfObject::Dictionary(pdf_page.to_dictionary(pages_ref)))?;
            pdf.write_stream_object(content_ref, PdfStream::new(content.content.into_bytes()))?;
        }

        for (font, font_ref) in &font_refs {
            let dict = standard_font_dict(font.face);
            pdf.write_object(*font_ref, &PdfObject::Dictionary(dict))?;
        }
        if let (Some(image), Some(image_ref)) = (image, image_ref) {
            pdf.write_stream_object(image_ref, image.to_xobject())?;
        }

        pdf.write_object(pages_ref, &PdfObject::Dictionary(create_pages(&page_refs)))?;
        pdf.write_object(catalog_ref, &PdfObject::Dictionary(create_catalog(pages_ref)))?;
        pdf.write_object(info_ref, &PdfObject::Dictionary(self.info.to_dictionary()))?;
        pdf.write_xref_and_trailer(catalog_ref, Some(info_ref))?;

        tracing::debug!(
            pages = page_refs.len(),
            fonts = font_refs.len(),
            image = image_ref.is_some(),
            "PDF document written"
        );
        pdf.finish()
    }

    /// Write `pages` into a byte vector
    pub fn write_to_vec(&self, pages: &[RenderedPage], image: Option<&ImageData>) -> Result<Vec<u8>> {
        self.write(pages, image, Vec::new())
    }
}
