//! Rendered pages - positioned draw instructions
//!
//! Coordinates use a top-left origin with `y` growing downwards, in points.

use doc_model::Color;
use serde::Serialize;
use std::ops::Range;
use text_engine::FontSpec;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A run of text drawn on one line in one font
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub text: String,
    /// Left edge of the run
    pub x: f32,
    /// Baseline position
    pub baseline: f32,
    /// Top of the line the run sits on
    pub line_top: f32,
    pub line_height: f32,
    pub width: f32,
    pub font: FontSpec,
    pub color: Color,
    pub underline: bool,
    pub link: Option<String>,
}

impl TextItem {
    /// Box covering the run on its line
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.line_top, self.width, self.line_height)
    }
}

/// The header image, stretched into `rect`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageItem {
    pub rect: Rect,
}

/// A clickable region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkArea {
    pub rect: Rect,
    pub url: String,
}

/// One draw instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawItem {
    Text(TextItem),
    Image(ImageItem),
}

/// A finished page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    /// Zero-based page index
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub items: Vec<DrawItem>,
    /// Byte range of the body text shown on this page
    pub body_range: Option<Range<usize>>,
}

impl RenderedPage {
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            items: Vec::new(),
            body_range: None,
        }
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn text_items(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text(text) => Some(text),
            DrawItem::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageItem> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Image(image) => Some(image),
            DrawItem::Text(_) => None,
        })
    }

    /// Clickable areas of the link runs on this page
    pub fn link_areas(&self) -> Vec<LinkArea> {
        self.text_items()
            .filter_map(|item| {
                item.link.as_ref().map(|url| LinkArea {
                    rect: item.bounds(),
                    url: url.clone(),
                })
            })
            .collect()
    }

    /// Drawn text in order, one entry per run
    pub fn plain_text(&self) -> String {
        self.text_items().map(|item| item.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, link: Option<&str>) -> TextItem {
        TextItem {
            text: text.to_string(),
            x: 20.0,
            baseline: 40.0,
            line_top: 30.0,
            line_height: 19.2,
            width: 50.0,
            font: FontSpec::regular(16.0),
            color: Color::BLACK,
            underline: link.is_some(),
            link: link.map(str::to_string),
        }
    }

    #[test]
    fn test_link_areas() {
        let mut page = RenderedPage::new(0, 595.0, 842.0);
        page.push(DrawItem::Text(item("plain", None)));
        page.push(DrawItem::Text(item("link", Some("https://example.com"))));

        let links = page.link_areas();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com");
        assert_eq!(links[0].rect, Rect::new(20.0, 30.0, 50.0, 19.2));
        assert_eq!(page.plain_text(), "plainlink");
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(5.0, 5.0));
        assert!(!rect.contains(10.0, 5.0));
    }
}
