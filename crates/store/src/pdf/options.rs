//! PDF Export Options

use serde::{Deserialize, Serialize};

/// Creator written to the document information dictionary
pub const DEFAULT_CREATOR: &str = "Sama Coachee";

/// Title used when the article has none
pub const DEFAULT_TITLE: &str = "Learning Hub Article";

/// Longest exported file name, in characters
pub const MAX_FILE_NAME_LEN: usize = 100;

/// Options for article PDF export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfExportOptions {
    /// Document title. The article title is used when unset.
    #[serde(default)]
    pub title: Option<String>,
    /// Creator application
    #[serde(default = "default_creator")]
    pub creator: String,
    /// Whether to compress content streams
    #[serde(default = "default_true")]
    pub compress: bool,
    /// Whether link runs get clickable annotations
    #[serde(default = "default_true")]
    pub include_links: bool,
    /// Cap on the suggested file name
    #[serde(default = "default_max_file_name_len")]
    pub max_file_name_len: usize,
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_file_name_len() -> usize {
    MAX_FILE_NAME_LEN
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            creator: default_creator(),
            compress: true,
            include_links: true,
            max_file_name_len: MAX_FILE_NAME_LEN,
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_links(mut self, include_links: bool) -> Self {
        self.include_links = include_links;
        self
    }

    /// Title for the information dictionary: the explicit option, then the
    /// article title, then the default
    pub fn effective_title<'a>(&'a self, article_title: Option<&'a str>) -> &'a str {
        self.title
            .as_deref()
            .or(article_title)
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PdfExportOptions::default();
        assert_eq!(options.creator, "Sama Coachee");
        assert!(options.compress);
        assert!(options.include_links);
        assert_eq!(options.max_file_name_len, 100);
    }

    #[test]
    fn test_effective_title() {
        let options = PdfExportOptions::new();
        assert_eq!(options.effective_title(None), "Learning Hub Article");
        assert_eq!(options.effective_title(Some("  ")), "Learning Hub Article");
        assert_eq!(options.effective_title(Some("Sleep")), "Sleep");
        assert_eq!(
            options.with_title("Override").effective_title(Some("Sleep")),
            "Override"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: PdfExportOptions = serde_json::from_str(r#"{"compress":false}"#).unwrap();
        assert!(!options.compress);
        assert_eq!(options.creator, DEFAULT_CREATOR);
        assert!(options.include_links);
    }
}
