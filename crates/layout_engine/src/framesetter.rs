//! Framesetter - line breaking and frame fitting for attributed text
//!
//! Lines are filled greedily between Unicode line break opportunities
//! (UAX #14). A frame takes lines starting at a byte offset until the next
//! line would overflow the available height; the frame's visible range is
//! where the next frame continues, so consecutive frames never skip or
//! repeat text.
//!
//! Every line covers its trailing whitespace and hard breaks, so the lines
//! of a text tile it without gaps.

use crate::role_font;
use doc_model::AttributedText;
use std::ops::Range;
use text_engine::{TextMeasurer, Typography};
use unicode_segmentation::UnicodeSegmentation;

/// Unicode line break opportunity types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOpportunity {
    /// Break allowed (after space, punctuation, etc.)
    Allowed,
    /// Break required (after hard line break)
    Mandatory,
}

/// A laid-out line, relative to the frame that holds it
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLine {
    /// Byte range in the source text, including trailing whitespace
    pub range: Range<usize>,
    /// Offset of the line top from the frame top
    pub top: f32,
    /// Width of the visible (non-trailing-whitespace) content
    pub width: f32,
    pub height: f32,
    /// Offset of the baseline from the line top
    pub baseline: f32,
}

impl FrameLine {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// The lines that fit a region, starting at some byte offset
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    start: usize,
    lines: Vec<FrameLine>,
}

impl Frame {
    /// Byte range of the text this frame shows
    pub fn visible_range(&self) -> Range<usize> {
        let end = self.lines.last().map_or(self.start, |line| line.range.end);
        self.start..end
    }

    pub fn lines(&self) -> &[FrameLine] {
        &self.lines
    }

    /// Height used by the lines
    pub fn height(&self) -> f32 {
        self.lines.last().map_or(0.0, FrameLine::bottom)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Breaks an [`AttributedText`] into lines of a fixed width.
pub struct Framesetter<'a> {
    text: &'a AttributedText,
    width: f32,
    typography: &'a Typography,
    measurer: &'a dyn TextMeasurer,
    breaks: Vec<(usize, BreakOpportunity)>,
}

impl<'a> Framesetter<'a> {
    pub fn new(
        text: &'a AttributedText,
        width: f32,
        typography: &'a Typography,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            text,
            width,
            typography,
            measurer,
            breaks: find_break_opportunities(text.text()),
        }
    }

    pub fn text(&self) -> &AttributedText {
        self.text
    }

    /// Lay out lines from `start` while they fit in `max_height`.
    ///
    /// With `force_first_line` the first line is placed even if it is taller
    /// than `max_height`, so a caller starting on a fresh page always makes
    /// progress.
    pub fn create_frame(&self, start: usize, max_height: f32, force_first_line: bool) -> Frame {
        let mut lines = Vec::new();
        let mut offset = start;
        let mut top = 0.0;

        while let Some(mut line) = self.next_line(offset) {
            let forced = lines.is_empty() && force_first_line;
            if top + line.height > max_height && !forced {
                break;
            }
            line.top = top;
            top += line.height;
            offset = line.range.end;
            lines.push(line);
        }

        Frame { start, lines }
    }

    /// Total height of the text from `start` with no height limit
    pub fn suggest_height(&self, start: usize) -> f32 {
        self.create_frame(start, f32::INFINITY, true).height()
    }

    /// Break the line starting at `start`
    pub fn next_line(&self, start: usize) -> Option<FrameLine> {
        let len = self.text.len();
        if start >= len {
            return None;
        }

        let first = self.breaks.partition_point(|(offset, _)| *offset <= start);
        let mut end = start;
        let mut width = 0.0;

        for &(offset, kind) in &self.breaks[first..] {
            let visible_end = trim_trailing_whitespace(self.text.text(), end..offset);
            let segment_visible = self.measure(end..visible_end);

            if end == start && segment_visible > self.width {
                // A single unbreakable segment wider than the line
                end = self.split_overlong(start, offset);
                break;
            }
            if end > start && width + segment_visible > self.width {
                break;
            }

            width += self.measure(end..offset);
            end = offset;
            if kind == BreakOpportunity::Mandatory {
                break;
            }
        }

        if end == start {
            // No break opportunity past `start`; take the rest
            end = len;
        }

        Some(self.line_for(start..end))
    }

    fn line_for(&self, range: Range<usize>) -> FrameLine {
        let visible_end = trim_trailing_whitespace(self.text.text(), range.clone());
        let mut height: f32 = 0.0;
        let mut baseline: f32 = 0.0;

        for (_, style) in self.text.runs_in(range.clone()) {
            let font = role_font(style.role, self.typography);
            height = height.max(self.measurer.line_height(&font));
            baseline = baseline.max(self.measurer.baseline_offset(&font));
        }

        FrameLine {
            width: self.measure(range.start..visible_end),
            range,
            top: 0.0,
            height,
            baseline,
        }
    }

    /// Advance of a byte range, font by font
    pub fn measure(&self, range: Range<usize>) -> f32 {
        self.text
            .runs_in(range)
            .map(|(sub, style)| {
                let font = role_font(style.role, self.typography);
                self.measurer.advance(&self.text.text()[sub], &font)
            })
            .sum()
    }

    /// End of the longest grapheme prefix of `start..end` that fits the
    /// width. Always takes at least one grapheme.
    fn split_overlong(&self, start: usize, end: usize) -> usize {
        let mut width = 0.0;
        let mut split = start;

        for (index, grapheme) in self.text.text()[start..end].grapheme_indices(true) {
            let from = start + index;
            let to = from + grapheme.len();
            let advance = self.measure(from..to);
            if split > start && width + advance > self.width {
                break;
            }
            width += advance;
            split = to;
        }

        split
    }
}

/// Break opportunities as (offset, kind), where `offset` is the byte index
/// a new line may start at.
pub fn find_break_opportunities(text: &str) -> Vec<(usize, BreakOpportunity)> {
    use unicode_linebreak::{linebreaks, BreakOpportunity as UnicodeBreak};

    linebreaks(text)
        .map(|(offset, kind)| {
            let kind = match kind {
                UnicodeBreak::Mandatory => BreakOpportunity::Mandatory,
                UnicodeBreak::Allowed => BreakOpportunity::Allowed,
            };
            (offset, kind)
        })
        .collect()
}

fn trim_trailing_whitespace(text: &str, range: Range<usize>) -> usize {
    range.start + text[range].trim_end().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::TextStyle;
    use text_engine::StandardMetrics;

    fn body(text: &str) -> AttributedText {
        AttributedText::styled(text, TextStyle::body())
    }

    fn all_lines(setter: &Framesetter) -> Vec<Range<usize>> {
        setter
            .create_frame(0, f32::INFINITY, true)
            .lines()
            .iter()
            .map(|line| line.range.clone())
            .collect()
    }

    #[test]
    fn test_breaks_between_words() {
        let text = body("aaa bbb ccc");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let width = metrics.advance("aaa bbb", &text_engine::FontSpec::regular(16.0)) + 1.0;
        let setter = Framesetter::new(&text, width, &typography, &metrics);

        assert_eq!(all_lines(&setter), vec![0..8, 8..11]);
        let first = setter.next_line(0).unwrap();
        // trailing space is not part of the visible width
        assert!(first.width < width);
    }

    #[test]
    fn test_hard_breaks() {
        let text = body("one\n\ntwo");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 500.0, &typography, &metrics);
        assert_eq!(all_lines(&setter), vec![0..4, 4..5, 5..8]);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let text = body("abcdefghijklmnopqrstuvwxyz");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 50.0, &typography, &metrics);

        let lines = all_lines(&setter);
        assert!(lines.len() > 1);
        assert_eq!(lines.first().map(|r| r.start), Some(0));
        assert_eq!(lines.last().map(|r| r.end), Some(text.len()));
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_width_narrower_than_a_glyph_still_progresses() {
        let text = body("WW");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 1.0, &typography, &metrics);
        assert_eq!(all_lines(&setter), vec![0..1, 1..2]);
    }

    #[test]
    fn test_frame_stops_at_height() {
        let text = body("a\nb\nc\nd");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 500.0, &typography, &metrics);
        let line_height = metrics.line_height(&text_engine::FontSpec::regular(16.0));

        let frame = setter.create_frame(0, line_height * 2.5, false);
        assert_eq!(frame.lines().len(), 2);
        assert_eq!(frame.visible_range(), 0..4);

        let next = setter.create_frame(frame.visible_range().end, line_height * 10.0, false);
        assert_eq!(next.visible_range(), 4..7);
    }

    #[test]
    fn test_force_first_line() {
        let text = body("hello");
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 500.0, &typography, &metrics);

        assert!(setter.create_frame(0, 1.0, false).is_empty());
        let forced = setter.create_frame(0, 1.0, true);
        assert_eq!(forced.visible_range(), 0..5);
    }

    #[test]
    fn test_mixed_fonts_take_tallest_line() {
        let mut text = AttributedText::new();
        text.push("small ", TextStyle::body());
        text.push("Big", TextStyle::heading());
        let typography = Typography::default();
        let metrics = StandardMetrics::new();
        let setter = Framesetter::new(&text, 500.0, &typography, &metrics);

        let line = setter.next_line(0).unwrap();
        let heading = metrics.line_height(&text_engine::FontSpec::bold(20.0));
        assert!((line.height - heading).abs() < 1e-3);
    }
}
