//! Application settings
//!
//! The password screens and the article exporter read their configuration
//! from one serde tree. Every field has a default, so a partial document
//! still deserializes.

use crate::pdf::PdfExportOptions;
use account::PasswordUpdateConfig;
use layout_engine::PageConfig;
use serde::{Deserialize, Serialize};

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Password update and reset screens
    pub password: PasswordUpdateConfig,
    /// Article PDF export
    pub export: ExportSettings,
}

/// Article export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub page: PageConfig,
    pub pdf: PdfExportOptions,
}
