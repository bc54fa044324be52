//! PDF Font Handling
//!
//! Article text is set in the standard Helvetica faces, which every viewer
//! provides, so nothing is embedded. Text is encoded as WinAnsi bytes and
//! the font dictionaries carry the same AFM widths the layout measured
//! with.

use super::objects::{PdfDictionary, PdfObject};
use text_engine::{char_width, standard_widths, FontFace, FIRST_TABLE_CHAR, LAST_TABLE_CHAR};
use unicode_segmentation::UnicodeSegmentation;

/// Last code in the WinAnsi table
const LAST_WIN_ANSI_CODE: u8 = 255;

/// Byte written for characters WinAnsi cannot express
const REPLACEMENT: u8 = b'?';

/// Code points of WinAnsi 0x80..=0x9F. Zero marks an unassigned code.
const WIN_ANSI_HIGH: [u16; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// WinAnsi code for `ch`
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&high| high != 0 && high as u32 == code)
            .map(|index| 0x80 + index as u8),
    }
}

/// Character a WinAnsi code stands for
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        0x80..=0x9F => match WIN_ANSI_HIGH[(code - 0x80) as usize] {
            0 => None,
            high => char::from_u32(high as u32),
        },
        _ => None,
    }
}

/// Encode text for a `Tj` operand.
///
/// One byte per grapheme cluster, taken from its first character, which is
/// how the layout measured it. Control characters are dropped.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.graphemes(true)
        .filter_map(|grapheme| grapheme.chars().next())
        .filter(|ch| !ch.is_control())
        .map(|ch| win_ansi_code(ch).unwrap_or(REPLACEMENT))
        .collect()
}

/// Width table for codes FIRST_TABLE_CHAR..=255
pub fn win_ansi_widths(face: FontFace) -> Vec<i64> {
    let ascii = standard_widths(face, FIRST_TABLE_CHAR, LAST_TABLE_CHAR).unwrap_or_default();
    let high = (LAST_TABLE_CHAR + 1..=LAST_WIN_ANSI_CODE).map(|code| {
        let ch = win_ansi_char(code).unwrap_or(REPLACEMENT as char);
        char_width(face, ch)
    });
    ascii
        .into_iter()
        .chain(high)
        .map(|width| width as i64)
        .collect()
}

/// Font dictionary for a standard face
pub fn standard_font_dict(face: FontFace) -> PdfDictionary {
    let widths = win_ansi_widths(face).into_iter().map(PdfObject::int).collect();

    PdfDictionary::new()
        .with_type("Font")
        .with("Subtype", PdfObject::name("Type1"))
        .with("BaseFont", PdfObject::name(face.postscript_name()))
        .with("Encoding", PdfObject::name("WinAnsiEncoding"))
        .with("FirstChar", PdfObject::int(FIRST_TABLE_CHAR as i64))
        .with("LastChar", PdfObject::int(LAST_WIN_ANSI_CODE as i64))
        .with("Widths", PdfObject::Array(widths))
}

/// A face used by the document and its resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    pub face: FontFace,
    /// Resource name, e.g. "F1"
    pub name: String,
}

/// Assigns resource names to faces in order of first use
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: Vec<FontResource>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for `face`, registering it on first use
    pub fn resource_name(&mut self, face: FontFace) -> &str {
        let index = match self.fonts.iter().position(|font| font.face == face) {
            Some(index) => index,
            None => {
                let name = format!("F{}", self.fonts.len() + 1);
                self.fonts.push(FontResource { face, name });
                self.fonts.len() - 1
            }
        };
        &self.fonts[index].name
    }

    pub fn get(&self, face: FontFace) -> Option<&FontResource> {
        self.fonts.iter().find(|font| font.face == face)
    }

    pub fn fonts(&self) -> &[FontResource] {
        &self.fonts
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
