/// Title matching shared by scoring and highlighting.
///
/// A query is tried against the title itself first, then (for Chinese
/// titles) against its pinyin renderings. Each attempt runs the same tiers:
/// exact, prefix, substring, then a gap-limited subsequence.

use crate::pinyin::{self, Transliteration};
use std::ops::Range;

/// Largest run of skipped title characters allowed between two matched
/// characters of a fuzzy match
pub const MAX_FUZZY_GAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Direct,
    Transliterated,
}

/// Which characters of the original title a match covers, in char indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    Span(Range<usize>),
    Chars(Vec<usize>),
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub kind: MatchKind,
    pub script: Script,
    pub score: u8,
    pub highlight: Highlight,
}

/// Match position inside whatever character sequence was searched
enum Hit {
    Span(Range<usize>),
    Chars(Vec<usize>),
}

/// Lowercased, trimmed characters plus the offset of the first kept
/// character in the original text. Folding is one char to one char so
/// indices map straight back.
struct Folded {
    chars: Vec<char>,
    offset: usize,
}

fn fold(text: &str) -> Folded {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(|c| !c.is_whitespace()).unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map_or(start, |i| i + 1);

    Folded {
        chars: chars[start..end]
            .iter()
            .map(|&c| c.to_lowercase().next().unwrap_or(c))
            .collect(),
        offset: start,
    }
}

/// Score of a title against a query, 0 when it does not match at all
pub fn score(title: &str, query: &str) -> u8 {
    match_title(title, query).map_or(0, |m| m.score)
}

/// Best match of `query` in `title`, or `None`
pub fn match_title(title: &str, query: &str) -> Option<TitleMatch> {
    let query = fold(query).chars;
    if query.is_empty() {
        return None;
    }

    let folded = fold(title);
    if folded.chars.is_empty() {
        return None;
    }

    if let Some((kind, hit)) = run_tiers(&folded.chars, &query) {
        let score = match kind {
            MatchKind::Exact => 100,
            MatchKind::Prefix => 80,
            MatchKind::Substring => 60,
            MatchKind::Fuzzy => fuzzy_score(&hit, folded.chars.len()),
        };
        let highlight = match hit {
            Hit::Span(range) => Highlight::Span(range.start + folded.offset..range.end + folded.offset),
            Hit::Chars(positions) => {
                Highlight::Chars(positions.into_iter().map(|p| p + folded.offset).collect())
            }
        };
        return Some(TitleMatch {
            kind,
            script: Script::Direct,
            score,
            highlight,
        });
    }

    if !pinyin::contains_han(title) {
        return None;
    }

    [pinyin::transliterate(&folded.chars), pinyin::initials(&folded.chars)]
        .iter()
        .filter_map(|rendering| transliterated_match(rendering, &query, folded.offset))
        .reduce(|best, next| if next.score > best.score { next } else { best })
}

fn transliterated_match(rendering: &Transliteration, query: &[char], offset: usize) -> Option<TitleMatch> {
    let (kind, hit) = run_tiers(&rendering.chars, query)?;

    let score = match kind {
        MatchKind::Exact => 30,
        MatchKind::Prefix => 28,
        MatchKind::Substring => 25,
        MatchKind::Fuzzy => 20,
    };
    let highlight = match hit {
        Hit::Span(range) => {
            let start = rendering.origin[range.start] + offset;
            let end = rendering.origin[range.end - 1] + offset + 1;
            Highlight::Span(start..end)
        }
        Hit::Chars(_) => Highlight::Whole,
    };

    Some(TitleMatch {
        kind,
        script: Script::Transliterated,
        score,
        highlight,
    })
}

fn run_tiers(text: &[char], query: &[char]) -> Option<(MatchKind, Hit)> {
    if text == query {
        return Some((MatchKind::Exact, Hit::Span(0..text.len())));
    }
    if text.starts_with(query) {
        return Some((MatchKind::Prefix, Hit::Span(0..query.len())));
    }
    if let Some(start) = find_chars(text, query) {
        return Some((MatchKind::Substring, Hit::Span(start..start + query.len())));
    }
    subsequence(text, query).map(|positions| (MatchKind::Fuzzy, Hit::Chars(positions)))
}

fn find_chars(text: &[char], query: &[char]) -> Option<usize> {
    if query.len() > text.len() {
        return None;
    }
    text.windows(query.len()).position(|window| window == query)
}

/// Matched positions of `query` as an in-order subsequence of `text`
/// respecting [`MAX_FUZZY_GAP`]. Each occurrence of the first query
/// character is tried as an anchor, with leftmost matching after it.
fn subsequence(text: &[char], query: &[char]) -> Option<Vec<usize>> {
    let (first, rest) = query.split_first()?;

    text.iter()
        .enumerate()
        .filter(|(_, c)| *c == first)
        .find_map(|(anchor, _)| {
            let mut positions = Vec::with_capacity(query.len());
            positions.push(anchor);
            let mut last = anchor;

            for wanted in rest {
                let window_end = (last + MAX_FUZZY_GAP + 2).min(text.len());
                let found = text[last + 1..window_end].iter().position(|c| c == wanted)?;
                last = last + 1 + found;
                positions.push(last);
            }

            Some(positions)
        })
}

/// 21..=40 by the share of title characters that matched
fn fuzzy_score(hit: &Hit, title_len: usize) -> u8 {
    let matched = match hit {
        Hit::Chars(positions) => positions.len(),
        Hit::Span(range) => range.len(),
    };
    let bonus = (20 * matched).div_ceil(title_len.max(1)).min(20);
    20 + bonus as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_scores() {
        assert_eq!(score("GitHub", "github"), 100);
        assert_eq!(score("GitHub", "git"), 80);
        assert_eq!(score("GitHub", "hub"), 60);
        assert_eq!(score("GitHub", "gtb"), 30);
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        assert_eq!(score("  GitHub ", " GITHUB"), 100);
        assert_eq!(score("GitHub", "   "), 0);
        assert_eq!(score("   ", "git"), 0);
    }

    #[test]
    fn test_no_shared_characters_scores_zero() {
        assert_eq!(score("GitHub", "xyz"), 0);
    }

    #[test]
    fn test_monotonic_tiers() {
        let title = "Rust Playground";
        let exact = score(title, "rust playground");
        let prefix = score(title, "rust");
        let substring = score(title, "play");

        assert!(exact >= prefix);
        assert!(prefix >= substring);
        assert!(substring > 0);
    }

    #[test]
    fn test_fuzzy_band() {
        let short = score("abc", "ac");
        let long = score("a_b_c_d_e_h", "ah");

        assert!((21..=40).contains(&short));
        assert!((21..=40).contains(&long));
        assert!(short > long);
    }

    #[test]
    fn test_fuzzy_gap_limit() {
        let within = format!("a{}b", "x".repeat(MAX_FUZZY_GAP));
        let beyond = format!("a{}b", "x".repeat(MAX_FUZZY_GAP + 1));

        assert!(score(&within, "ab") > 0);
        assert_eq!(score(&beyond, "ab"), 0);
    }

    #[test]
    fn test_fuzzy_retries_later_anchor() {
        let title = format!("a{}ab", "x".repeat(MAX_FUZZY_GAP + 5));

        let m = match_title(&title, "ab").unwrap();

        // "ab" is a plain substring at the end
        assert_eq!(m.kind, MatchKind::Substring);

        let title = format!("a{}a-b", "x".repeat(MAX_FUZZY_GAP + 5));
        let m = match_title(&title, "ab").unwrap();
        assert_eq!(m.kind, MatchKind::Fuzzy);
        assert_eq!(m.highlight, Highlight::Chars(vec![MAX_FUZZY_GAP + 6, MAX_FUZZY_GAP + 8]));
    }

    #[test]
    fn test_pinyin_tiers() {
        assert_eq!(score("百度", "baidu"), 30);
        assert_eq!(score("百度", "bai"), 28);
        assert_eq!(score("百度一下", "du"), 25);
        assert_eq!(score("百度", "bd"), 30);
        assert_eq!(score("百度地图", "bdd"), 28);
    }

    #[test]
    fn test_pinyin_never_outranks_direct() {
        let direct = match_title("百度 baidu", "baidu").unwrap();

        assert_eq!(direct.script, Script::Direct);
        assert_eq!(direct.kind, MatchKind::Substring);
    }

    #[test]
    fn test_pinyin_only_for_han_titles() {
        assert_eq!(score("Café", "kafei"), 0);
    }

    #[test]
    fn test_pinyin_span_maps_to_original_characters() {
        let m = match_title("我的百度", "baidu").unwrap();

        assert_eq!(m.script, Script::Transliterated);
        assert_eq!(m.highlight, Highlight::Span(2..4));
    }

    #[test]
    fn test_pinyin_fuzzy_highlights_whole() {
        let m = match_title("百度地图", "bidu").unwrap();

        assert_eq!(m.kind, MatchKind::Fuzzy);
        assert_eq!(m.score, 20);
        assert_eq!(m.highlight, Highlight::Whole);
    }

    #[test]
    fn test_direct_span_accounts_for_leading_whitespace() {
        let m = match_title("  GitHub", "hub").unwrap();

        assert_eq!(m.highlight, Highlight::Span(5..8));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(match_title("百度地图", "bdd"), match_title("百度地图", "bdd"));
    }
}
