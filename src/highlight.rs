/// Highlighting of the part of a title that matched a query

use crate::matching::{Highlight, match_title};

pub const MARK_OPEN: &str = "<em>";
pub const MARK_CLOSE: &str = "</em>";

/// A run of title text, emphasised or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Marked(String),
}

/// Split `text` into plain and matched runs. Text that does not match comes
/// back as a single plain segment.
pub fn highlight_segments(text: &str, query: &str) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();

    let Some(found) = match_title(text, query) else {
        return vec![Segment::Plain(text.to_string())];
    };

    let ranges: Vec<(usize, usize)> = match found.highlight {
        Highlight::Span(range) => vec![(range.start, range.end)],
        Highlight::Chars(positions) => positions.into_iter().map(|p| (p, p + 1)).collect(),
        Highlight::Whole => vec![(0, chars.len())],
    };

    let mut segments = Vec::new();
    let mut cursor = 0;

    for (start, end) in ranges {
        if start > cursor {
            segments.push(Segment::Plain(chars[cursor..start].iter().collect()));
        }
        segments.push(Segment::Marked(chars[start..end].iter().collect()));
        cursor = end;
    }
    if cursor < chars.len() {
        segments.push(Segment::Plain(chars[cursor..].iter().collect()));
    }

    segments
}

/// `text` with matched runs wrapped in `<em>` markers
pub fn highlight(text: &str, query: &str) -> String {
    highlight_segments(text, query)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(s) => s,
            Segment::Marked(s) => format!("{}{}{}", MARK_OPEN, s, MARK_CLOSE),
        })
        .collect()
}

/// Shorten to `max_chars` characters, appending "..." when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept)
}
