//! Jump candidates extracted from the visible part of a buffer.
//!
//! A [`Viewport`] holds the lines currently on screen. [`WordExtractor`] runs
//! the configured word patterns over each line and keeps the words that pass
//! every filter pattern.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Buffer position. Both coordinates are 1-based; `col` counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A jump candidate: one regex match on a visible line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub pos: Position,
}

impl Word {
    pub fn new(text: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            text: text.into(),
            pos: Position::new(line, col),
        }
    }
}

/// The visible lines of a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Buffer line number of `lines[0]` (1-based).
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl Viewport {
    pub fn new(first_line: usize, lines: Vec<String>) -> Self {
        Self {
            first_line: first_line.max(1),
            lines,
        }
    }

    /// Slice `height` lines starting at buffer line `top` out of `text`.
    pub fn from_text(text: &str, top: usize, height: usize) -> Self {
        let top = top.max(1);
        let lines = text
            .lines()
            .skip(top - 1)
            .take(height)
            .map(String::from)
            .collect();
        Self::new(top, lines)
    }

    /// Text of buffer line `line`, if it is on screen.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(self.first_line)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    pub fn last_line(&self) -> usize {
        self.first_line + self.lines.len().saturating_sub(1)
    }
}

/// Compiled word and filter patterns.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    word_patterns: Vec<Regex>,
    filter_patterns: Vec<Regex>,
}

impl WordExtractor {
    /// Compile the patterns, failing on the first malformed one.
    pub fn new<S: AsRef<str>>(
        word_patterns: &[S],
        filter_patterns: &[S],
    ) -> Result<Self, ApiError> {
        Ok(Self {
            word_patterns: compile_all(word_patterns)?,
            filter_patterns: compile_all(filter_patterns)?,
        })
    }

    /// Extract every candidate word on screen, top to bottom.
    ///
    /// Within a line, patterns are applied in configured order. When two
    /// patterns produce a word at the same column the first one wins.
    pub fn extract(&self, viewport: &Viewport) -> Vec<Word> {
        let mut words = Vec::new();

        for (idx, line) in viewport.lines.iter().enumerate() {
            let line_no = viewport.first_line + idx;
            let mut seen_cols = HashSet::new();

            for pattern in &self.word_patterns {
                for m in pattern.find_iter(line) {
                    if m.as_str().is_empty() || !self.passes_filters(m.as_str()) {
                        continue;
                    }
                    let col = m.start() + 1;
                    if seen_cols.insert(col) {
                        words.push(Word::new(m.as_str(), line_no, col));
                    }
                }
            }
        }

        words
    }

    fn passes_filters(&self, text: &str) -> bool {
        self.filter_patterns.iter().all(|f| f.is_match(text))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, ApiError> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Regex::new(p).map_err(|e| ApiError::invalid_pattern(p, &e.to_string()))
        })
        .collect()
}
