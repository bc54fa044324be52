//! Article pagination
//!
//! Flows an [`ArticleDocument`] onto fixed-size pages:
//!
//! 1. metadata line (only when category, duration and date are all known)
//! 2. title
//! 3. header image, full content width, height capped
//! 4. subtitle
//! 5. body, continued across as many pages as needed
//!
//! Header blocks move to a new page as a whole when they do not fit below
//! the current position. The body is split at line boundaries; each page
//! continues at the exact byte offset where the previous page stopped.

use crate::{
    DrawItem, Frame, Framesetter, ImageItem, LayoutError, Rect, RenderedPage, Result, TextItem,
    role_font,
};
use doc_model::{ArticleDocument, AttributedText, Color, MarkdownParser, TextRole, TextStyle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use text_engine::{StandardMetrics, TextMeasurer, Typography};

/// Page geometry and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    /// Page width in points (A4)
    pub page_width: f32,
    /// Page height in points (A4)
    pub page_height: f32,
    /// Margin on all four sides
    pub margin: f32,
    /// Space after each header block
    pub section_spacing: f32,
    /// Cap on the header image height
    pub max_image_height: f32,
    /// Multiplier applied to every line height
    pub line_spacing: f32,
    pub typography: Typography,
    pub link_color: Color,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 20.0,
            section_spacing: 10.0,
            max_image_height: 200.0,
            line_spacing: 1.0,
            typography: Typography::default(),
            link_color: Color::LINK,
        }
    }
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest `y` content may reach
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.content_width() > 0.0) || !(self.content_bottom() > self.margin) {
            return Err(LayoutError::InvalidPageSetup(format!(
                "margin {} leaves no room on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if !(self.line_spacing > 0.0) {
            return Err(LayoutError::InvalidPageSetup(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        Ok(())
    }
}

/// Pixel size of a decoded header image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl HeaderImage {
    pub fn new(pixel_width: u32, pixel_height: u32) -> Result<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(LayoutError::InvalidImageSize {
                width: pixel_width,
                height: pixel_height,
            });
        }
        Ok(Self {
            pixel_width,
            pixel_height,
        })
    }

    /// Height over width
    pub fn aspect_ratio(&self) -> f32 {
        self.pixel_height as f32 / self.pixel_width as f32
    }
}

/// Output of [`Paginator::paginate`]
#[derive(Debug, Clone)]
pub struct PaginatedArticle {
    pub pages: Vec<RenderedPage>,
    /// The parsed body the pages' body ranges refer to
    pub body: AttributedText,
}

impl PaginatedArticle {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Body text of every page, concatenated in page order
    pub fn visible_body_text(&self) -> String {
        self.pages
            .iter()
            .filter_map(|page| page.body_range.clone())
            .map(|range| &self.body.text()[range])
            .collect()
    }
}

/// Vertical position on the page being filled
struct PaginationCursor {
    pages: Vec<RenderedPage>,
    y: f32,
    width: f32,
    height: f32,
    top: f32,
}

impl PaginationCursor {
    fn new(config: &PageConfig) -> Self {
        Self {
            pages: vec![RenderedPage::new(0, config.page_width, config.page_height)],
            y: config.margin,
            width: config.page_width,
            height: config.page_height,
            top: config.margin,
        }
    }

    fn page(&mut self) -> &mut RenderedPage {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_top(&self) -> bool {
        self.y <= self.top
    }

    fn new_page(&mut self) {
        let index = self.pages.len();
        self.pages
            .push(RenderedPage::new(index, self.width, self.height));
        self.y = self.top;
        tracing::debug!(page = index, "page started");
    }
}

/// Lays articles out onto pages.
pub struct Paginator {
    config: PageConfig,
    measurer: Arc<dyn TextMeasurer>,
}

impl Paginator {
    /// Paginator measuring with the standard-face metrics
    pub fn new(config: PageConfig) -> Self {
        let measurer = StandardMetrics::new().with_line_spacing(config.line_spacing);
        Self {
            config,
            measurer: Arc::new(measurer),
        }
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Lay out `article`. `header_image` is the size of the already decoded
    /// header image, if there is one.
    pub fn paginate(
        &self,
        article: &ArticleDocument,
        header_image: Option<HeaderImage>,
    ) -> Result<PaginatedArticle> {
        self.config.validate()?;
        let mut cursor = PaginationCursor::new(&self.config);

        if let Some(metadata) = article.metadata_line() {
            self.place_block(&mut cursor, &metadata, TextRole::Metadata);
        }
        if let Some(title) = article.title() {
            self.place_block(&mut cursor, title, TextRole::Title);
        }
        if let Some(image) = header_image {
            self.place_image(&mut cursor, image);
        }
        if let Some(subtitle) = article.subtitle() {
            self.place_block(&mut cursor, subtitle, TextRole::Subtitle);
        }

        let body = MarkdownParser::new()
            .with_link_color(self.config.link_color)
            .parse(article.body());
        self.flow_body(&mut cursor, &body);

        tracing::debug!(pages = cursor.pages.len(), "article paginated");
        Ok(PaginatedArticle {
            pages: cursor.pages,
            body,
        })
    }

    fn framesetter<'a>(&'a self, text: &'a AttributedText) -> Framesetter<'a> {
        Framesetter::new(
            text,
            self.config.content_width(),
            &self.config.typography,
            self.measurer.as_ref(),
        )
    }

    /// Move to a new page unless `height` plus spacing fits below the cursor
    fn ensure_room(&self, cursor: &mut PaginationCursor, height: f32) {
        let fits = cursor.y + height + self.config.section_spacing <= self.config.content_bottom();
        if !fits && !cursor.at_top() {
            cursor.new_page();
        }
    }

    fn place_block(&self, cursor: &mut PaginationCursor, text: &str, role: TextRole) {
        let block = AttributedText::styled(text, TextStyle::new(role));
        let setter = self.framesetter(&block);
        let frame = setter.create_frame(0, f32::INFINITY, true);
        let height = frame.height();

        self.ensure_room(cursor, height);
        let top = cursor.y;
        self.draw_frame(cursor.page(), &setter, &frame, top);
        cursor.y += height + self.config.section_spacing;
    }

    fn place_image(&self, cursor: &mut PaginationCursor, image: HeaderImage) {
        let width = self.config.content_width();
        let height = (width * image.aspect_ratio()).min(self.config.max_image_height);

        self.ensure_room(cursor, height);
        let rect = Rect::new(self.config.margin, cursor.y, width, height);
        cursor.page().push(DrawItem::Image(ImageItem { rect }));
        cursor.y += height + self.config.section_spacing;
    }

    fn flow_body(&self, cursor: &mut PaginationCursor, body: &AttributedText) {
        let setter = self.framesetter(body);
        let mut offset = 0;

        loop {
            let available = (self.config.content_bottom() - cursor.y).max(0.0);
            let frame = setter.create_frame(offset, available, cursor.at_top());
            let range = frame.visible_range();

            if !frame.is_empty() {
                let top = cursor.y;
                self.draw_frame(cursor.page(), &setter, &frame, top);
                cursor.y += frame.height();
                cursor.page().body_range = Some(range.clone());
            }

            offset = range.end;
            if offset >= body.len() {
                break;
            }
            tracing::debug!(offset, "body continues on next page");
            cursor.new_page();
        }
    }

    fn draw_frame(&self, page: &mut RenderedPage, setter: &Framesetter, frame: &Frame, top: f32) {
        let text = setter.text();

        for line in frame.lines() {
            let line_top = top + line.top;
            let mut x = self.config.margin;

            for (range, style) in text.runs_in(line.range.clone()) {
                let font = role_font(style.role, &self.config.typography);
                let at_line_end = range.end == line.range.end;
                let piece = &text.text()[range];
                let drawn = if at_line_end {
                    piece.trim_end()
                } else {
                    piece.trim_end_matches(['\n', '\r'])
                };

                if !drawn.is_empty() {
                    page.push(DrawItem::Text(TextItem {
                        text: drawn.to_string(),
                        x,
                        baseline: line_top + line.baseline,
                        line_top,
                        line_height: line.height,
                        width: self.measurer.advance(drawn, &font),
                        font,
                        color: style.color,
                        underline: style.underline,
                        link: style.link.clone(),
                    }));
                }
                x += self.measurer.advance(piece, &font);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paginate(article: &ArticleDocument, image: Option<HeaderImage>) -> PaginatedArticle {
        Paginator::new(PageConfig::default())
            .paginate(article, image)
            .unwrap()
    }

    fn long_body(paragraphs: usize) -> String {
        (0..paragraphs)
            .map(|i| format!("Paragraph {i} talks about **habits** and [rest](https://example.com/{i}) for a while so that it wraps."))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_no_metadata_without_all_parts() {
        let article = ArticleDocument::new("Body")
            .with_title("Title")
            .with_category("Sleep")
            .with_date("1 Jan");
        let result = paginate(&article, None);

        let first = result.pages[0].text_items().next().unwrap();
        assert_eq!(first.text, "Title");
        assert!(result.pages[0]
            .text_items()
            .all(|item| !item.text.contains("MIN READ")));
    }

    #[test]
    fn test_header_order() {
        let article = ArticleDocument::new("Body")
            .with_title("Title")
            .with_subtitle("Sub")
            .with_category("Sleep")
            .with_duration(4)
            .with_date("1 Jan");
        let result = paginate(&article, Some(HeaderImage::new(400, 300).unwrap()));
        let page = &result.pages[0];

        let texts: Vec<_> = page.text_items().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, vec!["SLEEP · 4 MIN READ · 1 Jan", "Title", "Sub", "Body"]);

        let title = page.text_items().nth(1).unwrap();
        let image = page.images().next().unwrap();
        let subtitle = page.text_items().nth(2).unwrap();
        assert!(title.line_top < image.rect.y);
        assert!(image.rect.bottom() < subtitle.line_top);
        assert_eq!(title.font.size, 28.0);
    }

    #[test]
    fn test_image_height_is_capped() {
        let article = ArticleDocument::new("");
        let tall = paginate(&article, Some(HeaderImage::new(100, 400).unwrap()));
        let rect = tall.pages[0].images().next().unwrap().rect;
        assert_eq!(rect.width, 555.0);
        assert_eq!(rect.height, 200.0);

        let wide = paginate(&article, Some(HeaderImage::new(1110, 111).unwrap()));
        let rect = wide.pages[0].images().next().unwrap().rect;
        assert!((rect.height - 55.5).abs() < 1e-3);
        assert_eq!(rect.x, 20.0);
        assert_eq!(rect.y, 20.0);
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        assert!(HeaderImage::new(0, 10).is_err());
    }

    #[test]
    fn test_long_body_spans_pages_without_gaps() {
        let article = ArticleDocument::new(long_body(80)).with_title("Long read");
        let result = paginate(&article, None);

        assert!(result.page_count() >= 2);
        assert_eq!(result.visible_body_text(), result.body.text());

        let mut expected_start = 0;
        for page in &result.pages {
            let range = page.body_range.clone().unwrap();
            assert_eq!(range.start, expected_start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, result.body.len());
    }

    #[test]
    fn test_text_stays_inside_margins() {
        let article = ArticleDocument::new(long_body(80));
        let config = PageConfig::default();
        let result = paginate(&article, None);

        for page in &result.pages {
            for item in page.text_items() {
                assert!(item.line_top >= config.margin - 1e-3);
                assert!(item.line_top + item.line_height <= config.content_bottom() + 1e-3);
                assert!(item.x + item.width <= config.page_width - config.margin + 1e-3);
            }
        }
    }

    #[test]
    fn test_links_are_drawn_as_link_runs() {
        let article = ArticleDocument::new("See [docs](https://example.com)");
        let result = paginate(&article, None);
        let links = result.pages[0].link_areas();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com");
        let link_item = result.pages[0]
            .text_items()
            .find(|item| item.link.is_some())
            .unwrap();
        assert!(link_item.underline);
        assert_eq!(link_item.color, Color::LINK);
    }

    #[test]
    fn test_empty_body() {
        let article = ArticleDocument::new("").with_title("Only a title");
        let result = paginate(&article, None);
        assert_eq!(result.page_count(), 1);
        // an empty body is one blank line
        assert_eq!(result.pages[0].body_range, Some(0..1));
        assert_eq!(result.visible_body_text(), "\n");
    }

    #[test]
    fn test_block_moves_to_next_page() {
        let config = PageConfig {
            page_height: 120.0,
            ..PageConfig::default()
        };
        let article = ArticleDocument::new("")
            .with_title("First")
            .with_subtitle("Second");
        let result = Paginator::new(config)
            .paginate(&article, Some(HeaderImage::new(10, 10).unwrap()))
            .unwrap();

        // title on page one, image pushed to page two, subtitle below it
        assert!(result.page_count() >= 2);
        assert_eq!(result.pages[0].images().count(), 0);
        assert_eq!(result.pages[1].images().count(), 1);
    }

    #[test]
    fn test_line_taller_than_page_still_progresses() {
        let config = PageConfig {
            page_height: 50.0,
            typography: Typography {
                regular: 40.0,
                ..Typography::default()
            },
            ..PageConfig::default()
        };
        let article = ArticleDocument::new("one two three");
        let result = Paginator::new(config).paginate(&article, None).unwrap();
        assert_eq!(result.visible_body_text(), result.body.text());
    }

    #[test]
    fn test_invalid_config() {
        let config = PageConfig {
            margin: 400.0,
            ..PageConfig::default()
        };
        let result = Paginator::new(config).paginate(&ArticleDocument::new("x"), None);
        assert!(matches!(result, Err(LayoutError::InvalidPageSetup(_))));
    }

    proptest! {
        #[test]
        fn prop_pages_reconstruct_body(
            lines in prop::collection::vec("[a-zA-Z ,.*_\\[\\]()#]{0,120}", 1..60),
            page_height in 80.0f32..900.0,
        ) {
            let config = PageConfig { page_height, ..PageConfig::default() };
            let article = ArticleDocument::new(lines.join("\n")).with_title("T");
            let result = Paginator::new(config).paginate(&article, None).unwrap();
            prop_assert_eq!(result.visible_body_text(), result.body.text().to_string());
        }
    }
}
