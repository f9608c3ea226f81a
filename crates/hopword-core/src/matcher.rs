//! Match engines that rank words against the typed input.
//!
//! Two engines are available, selected by [`MatcherKind`]:
//!
//! | Kind | Algorithm | Matched span |
//! |------|-----------|--------------|
//! | **FuzzyScore** | nucleo fuzzy atom (smart case, smart normalization) | first to last matched char |
//! | **Transliteration** | accent/case-folded contiguous substring | the substring |
//!
//! Both are pure: the output depends only on `(input, words)`, and each
//! returns its matches best-first.

use std::str::FromStr;

use nucleo_matcher::chars;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::word::{Position, Word};

/// A word that matched the input, with the matched byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub word: Word,
    /// Byte offset of the matched span inside `word.text`.
    pub start: usize,
    /// Exclusive end of the matched span.
    pub end: usize,
    pub score: i64,
}

impl MatchResult {
    /// Buffer position of the first matched byte: `(line, col + start)`.
    pub fn effective_pos(&self) -> Position {
        Position::new(self.word.pos.line, self.word.pos.col + self.start)
    }
}

/// The available match engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    FuzzyScore,
    Transliteration,
}

impl MatcherKind {
    /// Rank `words` against `input`, best first.
    pub fn find_matches(self, input: &str, words: &[Word]) -> Vec<MatchResult> {
        if input.is_empty() {
            return Vec::new();
        }
        let mut results = match self {
            MatcherKind::FuzzyScore => fuzzy_matches(input, words),
            MatcherKind::Transliteration => transliteration_matches(input, words),
        };
        // Stable: equal scores keep word order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }

    /// Configuration identifier.
    pub fn name(self) -> &'static str {
        match self {
            MatcherKind::FuzzyScore => "fuzzy",
            MatcherKind::Transliteration => "transliteration",
        }
    }
}

impl FromStr for MatcherKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fuzzy" | "fuzzy_score" => Ok(MatcherKind::FuzzyScore),
            "transliteration" | "linear" => Ok(MatcherKind::Transliteration),
            _ => Err(ApiError::unknown_matcher(s)),
        }
    }
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn fuzzy_matches(input: &str, words: &[Word]) -> Vec<MatchResult> {
    let atom = Atom::new(
        input,
        CaseMatching::Smart,
        Normalization::Smart,
        AtomKind::Fuzzy,
        false,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf: Vec<char> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut results = Vec::new();

    for word in words {
        indices.clear();
        let haystack = if word.text.is_ascii() {
            Utf32Str::Ascii(word.text.as_bytes())
        } else {
            buf.clear();
            buf.extend(word.text.chars());
            Utf32Str::Unicode(&buf)
        };

        let Some(score) = atom.indices(haystack, &mut matcher, &mut indices) else {
            continue;
        };
        indices.sort_unstable();

        let (start, end) = match (indices.first(), indices.last()) {
            (Some(&first), Some(&last)) => char_span_to_bytes(&word.text, first, last),
            _ => (0, 0),
        };

        results.push(MatchResult {
            word: word.clone(),
            start,
            end,
            score: i64::from(score),
        });
    }

    results
}

/// Convert an inclusive char index range into a byte range.
fn char_span_to_bytes(text: &str, first: u32, last: u32) -> (usize, usize) {
    let mut start = 0;
    let mut end = text.len();
    for (idx, (byte, c)) in text.char_indices().enumerate() {
        if idx == first as usize {
            start = byte;
        }
        if idx == last as usize {
            end = byte + c.len_utf8();
            break;
        }
    }
    (start, end)
}

/// A folded character plus the byte span it came from.
struct FoldedChar {
    c: char,
    byte: usize,
    len: usize,
}

fn fold(c: char) -> char {
    chars::to_lower_case(chars::normalize(c))
}

fn fold_text(text: &str) -> Vec<FoldedChar> {
    text.char_indices()
        .map(|(byte, c)| FoldedChar {
            c: fold(c),
            byte,
            len: c.len_utf8(),
        })
        .collect()
}

const PREFIX_BONUS: i64 = 32;
const CHAR_SCORE: i64 = 16;

fn transliteration_matches(input: &str, words: &[Word]) -> Vec<MatchResult> {
    let needle: Vec<char> = input.chars().map(fold).collect();
    let mut results = Vec::new();

    for word in words {
        let hay = fold_text(&word.text);
        if hay.len() < needle.len() {
            continue;
        }

        let found = (0..=hay.len() - needle.len()).find(|&offset| {
            hay[offset..offset + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(h, n)| h.c == *n)
        });
        let Some(offset) = found else {
            continue;
        };

        let first = &hay[offset];
        let last = &hay[offset + needle.len() - 1];
        let mut score = needle.len() as i64 * CHAR_SCORE - offset as i64;
        if offset == 0 {
            score += PREFIX_BONUS;
        }

        results.push(MatchResult {
            word: word.clone(),
            start: first.byte,
            end: last.byte + last.len,
            score,
        });
    }

    results
}
