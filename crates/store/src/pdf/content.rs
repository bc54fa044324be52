//! PDF Content Stream Generation
//!
//! A builder for the graphics operators that paint a page. Only the
//! operators the article renderer needs are provided:
//!
//! - `q`/`Q`/`cm`: graphics state and transforms
//! - `rg`: fill color
//! - `re`/`f`: filled rectangles (underlines)
//! - `BT`/`ET`/`Tf`/`Td`/`Tj`: text
//! - `Do`: image XObjects

use super::objects::{fmt_num, write_literal};

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // =========================================================================
    // Graphics State Operators
    // =========================================================================

    /// Save the current graphics state (q)
    pub fn save_state(&mut self) -> &mut Self {
        self.write_line("q");
        self
    }

    /// Restore the graphics state (Q)
    pub fn restore_state(&mut self) -> &mut Self {
        self.write_line("Q");
        self
    }

    /// Concatenate a matrix to the CTM (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.write_operands(&[a, b, c, d, e, f], "cm");
        self
    }

    // =========================================================================
    // Color Operators
    // =========================================================================

    /// Set the fill color, components in 0..=1 (rg)
    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.write_operands(&[r, g, b], "rg");
        self
    }

    // =========================================================================
    // Path Operators
    // =========================================================================

    /// Append a rectangle to the path (re)
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.write_operands(&[x, y, width, height], "re");
        self
    }

    /// Fill the path, nonzero winding (f)
    pub fn fill(&mut self) -> &mut Self {
        self.write_line("f");
        self
    }

    // =========================================================================
    // Text Operators
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.write_line("BT");
        self
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.write_line("ET");
        self
    }

    /// Select a font resource and size (Tf)
    pub fn set_font(&mut self, resource: &str, size: f64) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(resource.as_bytes());
        self.data.push(b' ');
        self.write_operands(&[size], "Tf");
        self
    }

    /// Move to the start of the next line, offset from the current one (Td)
    pub fn move_text(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.write_operands(&[tx, ty], "Td");
        self
    }

    /// Show an already encoded string (Tj)
    pub fn show_text(&mut self, encoded: &[u8]) -> &mut Self {
        write_literal(&mut self.data, encoded);
        self.write_line(" Tj");
        self
    }

    // =========================================================================
    // XObject Operators
    // =========================================================================

    /// Paint an XObject (Do)
    pub fn draw_xobject(&mut self, resource: &str) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(resource.as_bytes());
        self.write_line(" Do");
        self
    }

    fn write_operands(&mut self, operands: &[f64], operator: &str) {
        for operand in operands {
            self.data.extend_from_slice(fmt_num(*operand).as_bytes());
            self.data.push(b' ');
        }
        self.write_line(operator);
    }

    fn write_line(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(b'\n');
    }
}
