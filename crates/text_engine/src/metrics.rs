//! Text metrics calculations
//!
//! Advance widths come from the Adobe AFM tables of the standard PDF faces,
//! so measured text lines up exactly with what a PDF viewer draws.

use crate::{FontFace, FontMetrics, FontSpec, Result, TextError};
use unicode_segmentation::UnicodeSegmentation;

/// First code point covered by the width tables
pub const FIRST_TABLE_CHAR: u8 = 32;
/// Last code point covered by the width tables
pub const LAST_TABLE_CHAR: u8 = 126;
/// Width used for characters outside the tables
pub const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width of `ch` in thousandths of an em
pub fn char_width(face: FontFace, ch: char) -> u16 {
    let table = match face {
        FontFace::Helvetica => &HELVETICA_WIDTHS,
        FontFace::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = ch as u32;
    if (FIRST_TABLE_CHAR as u32..=LAST_TABLE_CHAR as u32).contains(&code) {
        return table[(code - FIRST_TABLE_CHAR as u32) as usize];
    }
    match ch {
        '\u{a0}' => table[0],
        '\u{b7}' | '\u{2018}' | '\u{2019}' => 278,
        '\u{201c}' | '\u{201d}' => 500,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' => 1000,
        '\u{2022}' => 350,
        _ => FALLBACK_WIDTH,
    }
}

/// Width table for the code range `first..=last`, as written to a PDF font
/// dictionary
pub fn standard_widths(face: FontFace, first: u8, last: u8) -> Result<Vec<u16>> {
    if first > last {
        return Err(TextError::InvalidCharRange { first, last });
    }
    Ok((first..=last).map(|code| char_width(face, code as char)).collect())
}

/// Calculate line height from font metrics and font size
pub fn calculate_line_height(metrics: &FontMetrics, font_size: f32, line_spacing: f32) -> f32 {
    let em = font_size;
    let ascender = metrics.ascender as f32 / metrics.units_per_em as f32 * em;
    let descender = metrics.descender.abs() as f32 / metrics.units_per_em as f32 * em;
    let line_gap = metrics.line_gap as f32 / metrics.units_per_em as f32 * em;

    (ascender + descender + line_gap) * line_spacing
}

/// Calculate baseline offset from top of line
pub fn calculate_baseline_offset(metrics: &FontMetrics, font_size: f32) -> f32 {
    let em = font_size;
    let gap = metrics.line_gap as f32 / metrics.units_per_em as f32 * em;
    gap / 2.0 + metrics.ascender as f32 / metrics.units_per_em as f32 * em
}

/// Measures text for layout.
///
/// Implementations must be deterministic: the same text and font always
/// measure the same.
pub trait TextMeasurer: Send + Sync {
    /// Horizontal advance of `text` in points
    fn advance(&self, text: &str, font: &FontSpec) -> f32;

    /// Distance between consecutive baselines in points
    fn line_height(&self, font: &FontSpec) -> f32;

    /// Distance from the top of a line to its baseline in points
    fn baseline_offset(&self, font: &FontSpec) -> f32;
}

/// [`TextMeasurer`] backed by the standard-face AFM tables.
///
/// Each grapheme cluster advances by the width of its first character, so
/// combining marks add nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMetrics {
    line_spacing: f32,
}

impl Default for StandardMetrics {
    fn default() -> Self {
        Self { line_spacing: 1.0 }
    }
}

impl StandardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale line heights by `line_spacing`
    pub fn with_line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }
}

impl TextMeasurer for StandardMetrics {
    fn advance(&self, text: &str, font: &FontSpec) -> f32 {
        let face = font.face();
        let units: u32 = text
            .graphemes(true)
            .filter_map(|grapheme| grapheme.chars().next())
            .filter(|ch| !ch.is_control())
            .map(|ch| char_width(face, ch) as u32)
            .sum();
        units as f32 * font.size / 1000.0
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        calculate_line_height(&font.face().metrics(), font.size, self.line_spacing)
    }

    fn baseline_offset(&self, font: &FontSpec) -> f32 {
        calculate_baseline_offset(&font.face().metrics(), font.size)
    }
}
