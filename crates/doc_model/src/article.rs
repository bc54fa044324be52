//! Learning-hub article as handed to the exporter

use crate::{parse_markdown, AttributedText};
use serde::{Deserialize, Serialize};

/// An article with optional header fields and a markdown-subset body.
///
/// Built once with the `with_*` methods and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    header_image_url: Option<String>,
    #[serde(default)]
    body: String,
}

impl ArticleDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Publication date, already formatted for display
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Reading time in minutes
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_header_image_url(mut self, url: impl Into<String>) -> Self {
        self.header_image_url = Some(url.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    pub fn header_image_url(&self) -> Option<&str> {
        self.header_image_url.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `"<CATEGORY> · <N> MIN READ · <DATE>"`, only when all three parts are
    /// known.
    pub fn metadata_line(&self) -> Option<String> {
        let category = self.category.as_deref()?;
        let minutes = self.duration_minutes?;
        let date = self.date.as_deref()?;
        Some(format!(
            "{} \u{b7} {} MIN READ \u{b7} {}",
            category.to_uppercase(),
            minutes,
            date
        ))
    }

    /// Body parsed with the default link color
    pub fn parsed_body(&self) -> AttributedText {
        parse_markdown(&self.body)
    }
}
