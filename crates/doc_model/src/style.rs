//! Text styling - semantic roles, colors and run attributes

use crate::{DocModelError, Result};
use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Accent color used for links
    pub const LINK: Color = Color::from_u32(0x2E7C8B);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a packed `0xRRGGBB` value
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(DocModelError::InvalidColor(hex.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_u32)
            .map_err(|_| DocModelError::InvalidColor(hex.to_string()))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0`
    pub fn to_unit_rgb(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// What a piece of text is, independent of the font that renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    /// Category, reading time and date line
    Metadata,
    Title,
    Subtitle,
    /// Plain body text
    #[default]
    Body,
    /// Bold body text
    Strong,
    /// `## ` section header
    Heading,
}

/// Attributes shared by every character of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub role: TextRole,
    pub color: Color,
    pub underline: bool,
    /// Target of a clickable link
    pub link: Option<String>,
}

impl TextStyle {
    pub fn new(role: TextRole) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    pub fn body() -> Self {
        Self::new(TextRole::Body)
    }

    pub fn strong() -> Self {
        Self::new(TextRole::Strong)
    }

    pub fn heading() -> Self {
        Self::new(TextRole::Heading)
    }

    /// Underlined body text in `color`, optionally clickable
    pub fn link(color: Color, url: Option<String>) -> Self {
        Self {
            role: TextRole::Body,
            color,
            underline: true,
            link: url,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}
