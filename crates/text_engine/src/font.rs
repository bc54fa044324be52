//! Font faces, specs and the app type scale

use serde::{Deserialize, Serialize};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Faces the exporter can draw without embedding font programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    /// Sans-serif face for `weight`
    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => FontFace::Helvetica,
            FontWeight::Bold => FontFace::HelveticaBold,
        }
    }

    /// PostScript name
    pub fn postscript_name(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        match self {
            FontFace::Helvetica => FontMetrics::HELVETICA,
            FontFace::HelveticaBold => FontMetrics::HELVETICA_BOLD,
        }
    }
}

/// A concrete font: size in points plus weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }

    pub fn face(&self) -> FontFace {
        FontFace::for_weight(self.weight)
    }
}

/// Vertical font metrics in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Units per em
    pub units_per_em: u16,
    /// Ascender (positive)
    pub ascender: i16,
    /// Descender (negative)
    pub descender: i16,
    /// Line gap
    pub line_gap: i16,
    /// Cap height
    pub cap_height: i16,
}

impl FontMetrics {
    /// Helvetica AFM values. The line gap brings the default line height to
    /// 1.2 em.
    pub const HELVETICA: FontMetrics = FontMetrics {
        units_per_em: 1000,
        ascender: 718,
        descender: -207,
        line_gap: 275,
        cap_height: 718,
    };

    pub const HELVETICA_BOLD: FontMetrics = FontMetrics {
        units_per_em: 1000,
        ascender: 718,
        descender: -207,
        line_gap: 275,
        cap_height: 718,
    };
}

/// Point sizes of the app's text styles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub caption: f32,
    pub regular: f32,
    pub large: f32,
    pub x_large: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            caption: 12.0,
            regular: 16.0,
            large: 20.0,
            x_large: 28.0,
        }
    }
}
