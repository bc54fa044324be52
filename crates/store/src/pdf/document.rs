//! PDF Document Structure
//!
//! Catalog, page tree, pages with their resources, and the document
//! information dictionary.

use super::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};

/// Version written to the file header. PNG predictors and 16-bit samples
/// need 1.5.
pub const PDF_VERSION: &str = "1.7";

/// PDF document information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            creator: Some(creator.into()),
            creation_date: Some(Utc::now()),
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();

        if let Some(ref title) = self.title {
            dict.insert("Title", PdfObject::text(title));
        }
        if let Some(ref creator) = self.creator {
            dict.insert("Creator", PdfObject::text(creator));
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(&date)));
        }

        dict
    }
}

/// Date in PDF string form, `D:YYYYMMDDHHmmSSZ`
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Page media box (page dimensions)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::numbers(&[0.0, 0.0, self.width, self.height])
    }
}

/// PDF page object
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub media_box: MediaBox,
    pub content_ref: u32,
    /// Font resources in resource-name order
    pub fonts: Vec<(String, u32)>,
    /// Image XObject resources
    pub images: Vec<(String, u32)>,
    /// Link annotation objects
    pub annotations: Vec<u32>,
}

impl PdfPage {
    pub fn new(media_box: MediaBox, content_ref: u32) -> Self {
        Self {
            media_box,
            content_ref,
            fonts: Vec::new(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn add_font(&mut self, name: impl Into<String>, obj_ref: u32) {
        self.fonts.push((name.into(), obj_ref));
    }

    pub fn add_image(&mut self, name: impl Into<String>, obj_ref: u32) {
        self.images.push((name.into(), obj_ref));
    }

    pub fn add_annotation(&mut self, obj_ref: u32) {
        self.annotations.push(obj_ref);
    }

    pub fn build_resources(&self) -> PdfDictionary {
        let mut resources = PdfDictionary::new();

        if !self.fonts.is_empty() {
            let mut font_dict = PdfDictionary::new();
            for (name, obj_ref) in &self.fonts {
                font_dict.insert(name.clone(), PdfObject::reference(*obj_ref));
            }
            resources.insert("Font", PdfObject::Dictionary(font_dict));
        }

        if !self.images.is_empty() {
            let mut xobject_dict = PdfDictionary::new();
            for (name, obj_ref) in &self.images {
                xobject_dict.insert(name.clone(), PdfObject::reference(*obj_ref));
            }
            resources.insert("XObject", PdfObject::Dictionary(xobject_dict));
        }

        resources
    }

    pub fn to_dictionary(&self, parent_ref: u32) -> PdfDictionary {
        let mut dict = PdfDictionary::new()
            .with_type("Page")
            .with("Parent", PdfObject::reference(parent_ref))
            .with("MediaBox", self.media_box.to_array())
            .with("Resources", PdfObject::Dictionary(self.build_resources()))
            .with("Contents", PdfObject::reference(self.content_ref));

        if !self.annotations.is_empty() {
            let annots = self
                .annotations
                .iter()
                .map(|&r| PdfObject::reference(r))
                .collect();
            dict.insert("Annots", PdfObject::Array(annots));
        }

        dict
    }
}

/// Link annotation opening `url`. `rect` is `[llx, lly, urx, ury]` in PDF
/// space.
pub fn create_link_annotation(rect: [f64; 4], url: &str) -> PdfDictionary {
    let action = PdfDictionary::new()
        .with_type("Action")
        .with("S", PdfObject::name("URI"))
        .with("URI", PdfObject::string(url.as_bytes()));

    PdfDictionary::new()
        .with_type("Annot")
        .with("Subtype", PdfObject::name("Link"))
        .with("Rect", PdfObject::numbers(&rect))
        .with("Border", PdfObject::numbers(&[0.0, 0.0, 0.0]))
        .with("A", PdfObject::Dictionary(action))
}

pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    PdfDictionary::new()
        .with_type("Catalog")
        .with("Pages", PdfObject::reference(pages_ref))
}

/// Page tree root
pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let kids = page_refs.iter().map(|&r| PdfObject::reference(r)).collect();

    PdfDictionary::new()
        .with_type("Pages")
        .with("Kids", PdfObject::Array(kids))
        .with("Count", PdfObject::int(page_refs.len() as i64))
}
