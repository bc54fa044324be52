//! Markdown subset used by article bodies
//!
//! Line oriented, one pass per line, no nesting:
//!
//! - blank line: a single line break
//! - `## text`: section header followed by a blank line
//! - otherwise `[text](url)` links, with `**bold**` / `__bold__` spans in the
//!   text between links; each line ends with a blank line
//!
//! Anything that does not match is kept verbatim as body text. Parsing
//! never fails.

use crate::{AttributedText, Color, TextStyle};

const HEADER_PREFIX: &str = "## ";
const PARAGRAPH_BREAK: &str = "\n\n";
const BOLD_MARKERS: [&str; 2] = ["**", "__"];

/// Line separators. Each one ends a line on its own, so `\r\n` also
/// produces an empty line.
fn is_line_separator(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Markdown-subset parser producing [`AttributedText`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownParser {
    link_color: Color,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self {
            link_color: Color::LINK,
        }
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_color(mut self, color: Color) -> Self {
        self.link_color = color;
        self
    }

    pub fn parse(&self, markdown: &str) -> AttributedText {
        let mut out = AttributedText::new();

        for raw_line in markdown.split(is_line_separator) {
            let line = raw_line.trim();

            if line.is_empty() {
                out.push("\n", TextStyle::body());
                continue;
            }

            if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
                out.push(header, TextStyle::heading());
                out.push(PARAGRAPH_BREAK, TextStyle::heading());
                continue;
            }

            self.parse_inline(line, &mut out);
            out.push(PARAGRAPH_BREAK, TextStyle::body());
        }

        out
    }

    fn parse_inline(&self, line: &str, out: &mut AttributedText) {
        let mut rest = line;
        while !rest.is_empty() {
            let Some(link) = find_link(rest) else {
                push_emphasis(rest, out);
                break;
            };

            push_emphasis(&rest[..link.start], out);
            let url = is_plausible_url(link.url).then(|| link.url.to_string());
            out.push(link.text, TextStyle::link(self.link_color, url));
            rest = &rest[link.end..];
        }
    }
}

/// Parse with the default link color
pub fn parse_markdown(markdown: &str) -> AttributedText {
    MarkdownParser::default().parse(markdown)
}

/// Whether `url` can be used as a link target. Empty strings and strings
/// containing whitespace are rejected.
pub fn is_plausible_url(url: &str) -> bool {
    !url.is_empty() && !url.chars().any(char::is_whitespace)
}

struct LinkMatch<'a> {
    start: usize,
    end: usize,
    text: &'a str,
    url: &'a str,
}

/// First `[text](url)` in `s`: the first `[`, then the first `](` after it,
/// then the first `)` after that.
fn find_link(s: &str) -> Option<LinkMatch<'_>> {
    let open = s.find('[')?;
    let text_start = open + 1;
    let middle = text_start + s[text_start..].find("](")?;
    let url_start = middle + 2;
    let close = url_start + s[url_start..].find(')')?;

    Some(LinkMatch {
        start: open,
        end: close + 1,
        text: &s[text_start..middle],
        url: &s[url_start..close],
    })
}

/// First complete `marker ... marker` pair, as (open, close) offsets.
fn find_pair(s: &str, marker: &str) -> Option<(usize, usize)> {
    let open = s.find(marker)?;
    let inner = open + marker.len();
    let close = inner + s[inner..].find(marker)?;
    Some((open, close))
}

fn push_emphasis(text: &str, out: &mut AttributedText) {
    let mut rest = text;
    while !rest.is_empty() {
        // `**` pairs win over `__` pairs wherever they appear
        let found = BOLD_MARKERS
            .iter()
            .find_map(|marker| find_pair(rest, marker).map(|pair| (pair, marker.len())));

        let Some(((open, close), marker_len)) = found else {
            out.push(rest, TextStyle::body());
            break;
        };

        out.push(&rest[..open], TextStyle::body());
        out.push(&rest[open + marker_len..close], TextStyle::strong());
        rest = &rest[close + marker_len..];
    }
}
