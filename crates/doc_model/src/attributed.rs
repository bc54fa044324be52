//! Attributed text - a string with styled, non-overlapping runs
//!
//! Runs are byte ranges into the text. They cover the whole string in order
//! with no gaps, and adjacent runs never share a style (pushing text with the
//! style of the last run extends it).

use crate::{DocModelError, Result, TextStyle};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A styled byte range of an [`AttributedText`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub style: TextStyle,
}

impl StyledRun {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Text with run-level styling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedText {
    text: String,
    runs: Vec<StyledRun>,
}

impl AttributedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single run of `text` in `style`
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let mut attributed = Self::new();
        attributed.push(&text.into(), style);
        attributed
    }

    /// Append `text` in `style`. Empty text is ignored.
    pub fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();

        match self.runs.last_mut() {
            Some(last) if last.style == style => last.range.end = end,
            _ => self.runs.push(StyledRun {
                range: start..end,
                style,
            }),
        }
    }

    /// Append every run of `other`
    pub fn append(&mut self, other: &AttributedText) {
        for run in &other.runs {
            self.push(&other.text[run.range.clone()], run.style.clone());
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Text of a run
    pub fn run_text(&self, run: &StyledRun) -> &str {
        &self.text[run.range.clone()]
    }

    /// Style at byte `offset`
    pub fn style_at(&self, offset: usize) -> Option<&TextStyle> {
        self.runs
            .iter()
            .find(|run| run.range.contains(&offset))
            .map(|run| &run.style)
    }

    /// Runs clipped to `range`, in order. Empty intersections are skipped.
    pub fn runs_in(&self, range: Range<usize>) -> impl Iterator<Item = (Range<usize>, &TextStyle)> + '_ {
        self.runs.iter().filter_map(move |run| {
            let start = run.range.start.max(range.start);
            let end = run.range.end.min(range.end);
            (start < end).then(|| (start..end, &run.style))
        })
    }

    /// Check that `range` lies within the text on character boundaries
    pub fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.text.len() {
            return Err(DocModelError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.text.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(DocModelError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }

    /// Copy of the sub-range, with runs rebased to zero
    pub fn slice(&self, range: Range<usize>) -> Result<AttributedText> {
        self.check_range(&range)?;
        let mut sliced = AttributedText::new();
        for (sub, style) in self.runs_in(range) {
            sliced.push(&self.text[sub], style.clone());
        }
        Ok(sliced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextRole;

    #[test]
    fn test_push_merges_equal_styles() {
        let mut text = AttributedText::new();
        text.push("Hello ", TextStyle::body());
        text.push("there", TextStyle::body());
        text.push("!", TextStyle::strong());
        text.push("", TextStyle::heading());

        assert_eq!(text.text(), "Hello there!");
        assert_eq!(text.runs().len(), 2);
        assert_eq!(text.runs()[0].range, 0..11);
        assert_eq!(text.runs()[1].style.role, TextRole::Strong);
    }

    #[test]
    fn test_runs_in_clips() {
        let mut text = AttributedText::new();
        text.push("abc", TextStyle::body());
        text.push("def", TextStyle::strong());

        let clipped: Vec<_> = text.runs_in(2..4).map(|(r, s)| (r, s.role)).collect();
        assert_eq!(
            clipped,
            vec![(2..3, TextRole::Body), (3..4, TextRole::Strong)]
        );
    }

    #[test]
    fn test_slice() {
        let mut text = AttributedText::new();
        text.push("abc", TextStyle::body());
        text.push("déf", TextStyle::strong());

        let sliced = text.slice(1..6).unwrap();
        assert_eq!(sliced.text(), "bcd\u{e9}");
        assert_eq!(sliced.runs()[0].range, 0..2);
        assert_eq!(sliced.runs()[1].range, 2..5);

        // inside the two-byte é
        assert_eq!(
            text.slice(0..5),
            Err(DocModelError::NotCharBoundary(5))
        );
        assert!(matches!(
            text.slice(2..40),
            Err(DocModelError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_style_at() {
        let text = AttributedText::styled("x", TextStyle::heading());
        assert_eq!(text.style_at(0).map(|s| s.role), Some(TextRole::Heading));
        assert!(text.style_at(1).is_none());
    }
}
