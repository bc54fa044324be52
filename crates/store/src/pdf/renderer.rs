//! Layout to PDF Conversion
//!
//! Turns a [`RenderedPage`] into a content stream. Layout coordinates have
//! a top-left origin with `y` growing downwards; PDF user space has its
//! origin at the bottom-left, so every `y` is flipped against the page
//! height here.

use super::content::ContentStream;
use super::fonts::{encode_win_ansi, FontRegistry};
use doc_model::Color;
use layout_engine::{DrawItem, ImageItem, Rect, RenderedPage, TextItem};

/// Resource name of the header image
pub const IMAGE_RESOURCE: &str = "Im1";

/// Underline offset below the baseline, in em (AFM UnderlinePosition)
const UNDERLINE_POSITION: f64 = -0.1;
/// Underline thickness, in em (AFM UnderlineThickness)
const UNDERLINE_THICKNESS: f64 = 0.05;

/// A clickable area in PDF space
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLink {
    /// `[llx, lly, urx, ury]`
    pub rect: [f64; 4],
    pub url: String,
}

/// Everything a page needs besides its dictionary
#[derive(Debug)]
pub struct RenderedContent {
    pub content: ContentStream,
    pub draws_image: bool,
    pub links: Vec<PdfLink>,
}

/// Renders pages, collecting the fonts they use
#[derive(Debug, Default)]
pub struct PdfRenderer {
    fonts: FontRegistry,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_registry(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Render one page. `has_image` tells whether an image XObject is
    /// available; image items are skipped without one.
    pub fn render_page(&mut self, page: &RenderedPage, has_image: bool) -> RenderedContent {
        let page_height = page.height as f64;
        let mut content = ContentStream::new();
        let mut fill = Color::BLACK;
        let mut draws_image = false;

        for item in &page.items {
            match item {
                DrawItem::Text(text) => {
                    if text.text.trim().is_empty() {
                        continue;
                    }
                    if text.color != fill {
                        let (r, g, b) = text.color.to_unit_rgb();
                        content.set_fill_rgb(r, g, b);
                        fill = text.color;
                    }
                    self.render_text(&mut content, text, page_height);
                }
                DrawItem::Image(image) if has_image => {
                    render_image(&mut content, image, page_height);
                    draws_image = true;
                }
                DrawItem::Image(_) => {}
            }
        }

        let links = page
            .link_areas()
            .into_iter()
            .map(|area| PdfLink {
                rect: flip_rect(&area.rect, page_height),
                url: area.url,
            })
            .collect();

        RenderedContent {
            content,
            draws_image,
            links,
        }
    }

    fn render_text(&mut self, content: &mut ContentStream, text: &TextItem, page_height: f64) {
        let size = text.font.size as f64;
        let x = text.x as f64;
        let baseline = page_height - text.baseline as f64;
        let resource = self.fonts.resource_name(text.font.face());

        content
            .begin_text()
            .set_font(resource, size)
            .move_text(x, baseline)
            .show_text(&encode_win_ansi(&text.text))
            .end_text();

        if text.underline {
            let thickness = UNDERLINE_THICKNESS * size;
            let center = baseline + UNDERLINE_POSITION * size;
            content
                .rect(x, center - thickness / 2.0, text.width as f64, thickness)
                .fill();
        }
    }
}

fn render_image(content: &mut ContentStream, image: &ImageItem, page_height: f64) {
    let [llx, lly, urx, ury] = flip_rect(&image.rect, page_height);
    content
        .save_state()
        .transform(urx - llx, 0.0, 0.0, ury - lly, llx, lly)
        .draw_xobject(IMAGE_RESOURCE)
        .restore_state();
}

/// Layout rectangle to `[llx, lly, urx, ury]` in PDF space
pub fn flip_rect(rect: &Rect, page_height: f64) -> [f64; 4] {
    [
        rect.x as f64,
        page_height - rect.bottom() as f64,
        rect.right() as f64,
        page_height - rect.y as f64,
    ]
}
