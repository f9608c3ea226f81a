//! Label assignment for jump targets.
//!
//! Each surviving match gets a single-character label from a fixed
//! alphabet. Labels are stable: a match that keeps appearing while the user
//! types keeps the label it was first shown with, so a label the user is
//! about to press never moves to another word.
//!
//! Identity is the [`TargetKey`] `(line, col, start)`, never the label
//! itself. The [`LabelCache`] holds the previous pass's targets and is
//! replaced wholesale by every pass.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ApiError;
use crate::matcher::MatchResult;
use crate::word::Position;

/// Ordered set of label characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAlphabet {
    labels: Vec<char>,
}

impl LabelAlphabet {
    /// Build an alphabet from label strings; each label is its first char.
    ///
    /// Fails on an empty entry or when two entries share a first char.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, ApiError> {
        let mut seen = HashSet::new();
        let mut chars = Vec::with_capacity(labels.len());

        for (idx, label) in labels.iter().enumerate() {
            let c = label
                .as_ref()
                .chars()
                .next()
                .ok_or_else(|| ApiError::empty_label(idx))?;
            if !seen.insert(c) {
                return Err(ApiError::duplicate_label(c));
            }
            chars.push(c);
        }

        if chars.is_empty() {
            return Err(ApiError::invalid_config("The label alphabet is empty"));
        }

        Ok(Self { labels: chars })
    }

    /// Build an alphabet from the characters of a string ("asdf").
    pub fn from_chars(chars: &str) -> Result<Self, ApiError> {
        let labels: Vec<String> = chars.chars().map(String::from).collect();
        Self::new(&labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.labels.contains(&c)
    }

    pub fn chars(&self) -> &[char] {
        &self.labels
    }
}

/// Identity of a target across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetKey {
    pub line: usize,
    pub col: usize,
    pub start: usize,
}

impl TargetKey {
    pub fn of(result: &MatchResult) -> Self {
        Self {
            line: result.word.pos.line,
            col: result.word.pos.col,
            start: result.start,
        }
    }
}

/// A labeled, jumpable match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub pos: Position,
    pub score: i64,
    pub label: char,
}

impl Target {
    fn from_match(result: &MatchResult, label: char) -> Self {
        Self {
            text: result.word.text.clone(),
            start: result.start,
            end: result.end,
            pos: result.word.pos,
            score: result.score,
            label,
        }
    }

    pub fn key(&self) -> TargetKey {
        TargetKey {
            line: self.pos.line,
            col: self.pos.col,
            start: self.start,
        }
    }

    /// Where the cursor lands: the first matched byte.
    pub fn jump_pos(&self) -> Position {
        Position::new(self.pos.line, self.pos.col + self.start)
    }

    /// The matched slice of `text`, empty if the span is out of range.
    pub fn matched_text(&self) -> &str {
        self.text.get(self.start..self.end).unwrap_or("")
    }
}

/// The targets of the previous pass, source of label stability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCache {
    targets: Vec<Target>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Forget every assignment; the next pass labels from scratch.
    pub fn reset(&mut self) {
        self.targets.clear();
    }

    /// Label `results` against this cache without modifying it.
    ///
    /// Cached identities keep their label. New ones take the next alphabet
    /// char not used by the *previous* pass nor earlier in this pass; when
    /// the alphabet runs out they are dropped. Note that a label owned by a
    /// target which vanished in this pass stays reserved until the pass
    /// after.
    pub fn assign(&self, results: &[MatchResult], alphabet: &LabelAlphabet) -> Vec<Target> {
        let cached: HashMap<TargetKey, char> =
            self.targets.iter().map(|t| (t.key(), t.label)).collect();
        let mut in_use: HashSet<char> = self.targets.iter().map(|t| t.label).collect();

        let mut cursor = 0;
        let mut targets = Vec::with_capacity(results.len().min(alphabet.len()));

        for result in results {
            let label = match cached.get(&TargetKey::of(result)) {
                Some(&label) => label,
                None => {
                    let free = alphabet.chars()[cursor..]
                        .iter()
                        .position(|c| !in_use.contains(c));
                    match free {
                        Some(offset) => {
                            let label = alphabet.chars()[cursor + offset];
                            cursor += offset + 1;
                            label
                        }
                        None => {
                            cursor = alphabet.len();
                            trace!(
                                "alphabet exhausted, dropping match at {}",
                                result.effective_pos()
                            );
                            continue;
                        }
                    }
                }
            };

            in_use.insert(label);
            targets.push(Target::from_match(result, label));
        }

        targets
    }

    /// Label `results` and make the outcome the new cache contents.
    pub fn update(&mut self, results: &[MatchResult], alphabet: &LabelAlphabet) -> &[Target] {
        self.targets = self.assign(results, alphabet);
        &self.targets
    }

    /// Target currently shown with `label`.
    pub fn find(&self, label: char) -> Option<&Target> {
        self.targets.iter().find(|t| t.label == label)
    }
}

impl From<Vec<Target>> for LabelCache {
    fn from(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

/// Format targets for log lines and status output.
pub fn format_targets(targets: &[Target]) -> String {
    if targets.is_empty() {
        return "(none)".to_string();
    }

    // Show up to 10 targets
    let shown: Vec<String> = targets
        .iter()
        .take(10)
        .map(|t| format!("{}={}@{}", t.label, t.text, t.jump_pos()))
        .collect();

    let result = shown.join(", ");
    if targets.len() > 10 {
        format!("{}, ... and {} more", result, targets.len() - 10)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word;

    fn make_match(text: &str, line: usize, col: usize, start: usize) -> MatchResult {
        MatchResult {
            word: Word::new(text, line, col),
            start,
            end: start + 1,
            score: 0,
        }
    }

    fn alphabet(chars: &str) -> LabelAlphabet {
        LabelAlphabet::from_chars(chars).unwrap()
    }

    fn labels_of(targets: &[Target]) -> Vec<char> {
        targets.iter().map(|t| t.label).collect()
    }

    #[test]
    fn test_fresh_cache_assigns_in_alphabet_order() {
        let cache = LabelCache::new();
        let results = vec![
            make_match("foo", 1, 1, 0),
            make_match("bar", 1, 5, 0),
            make_match("baz", 2, 1, 0),
        ];

        let targets = cache.assign(&results, &alphabet("asd"));
        assert_eq!(labels_of(&targets), vec!['a', 's', 'd']);
    }

    #[test]
    fn test_assign_does_not_touch_cache() {
        let cache = LabelCache::new();
        let _ = cache.assign(&[make_match("foo", 1, 1, 0)], &alphabet("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_labels_stable_across_reordering() {
        let mut cache = LabelCache::new();
        let abc = alphabet("asd");

        cache.update(
            &[make_match("foo", 1, 1, 0), make_match("bar", 1, 5, 0)],
            &abc,
        );

        let targets = cache
            .update(
                &[make_match("bar", 1, 5, 0), make_match("foo", 1, 1, 0)],
                &abc,
            )
            .to_vec();

        assert_eq!(targets[0].text, "bar");
        assert_eq!(targets[0].label, 's');
        assert_eq!(targets[1].text, "foo");
        assert_eq!(targets[1].label, 'a');
    }

    #[test]
    fn test_new_target_skips_labels_in_use() {
        let mut cache = LabelCache::new();
        let abc = alphabet("asd");

        cache.update(&[make_match("bar", 1, 5, 0)], &abc);
        let targets = cache
            .update(
                &[make_match("foo", 1, 1, 0), make_match("bar", 1, 5, 0)],
                &abc,
            )
            .to_vec();

        assert_eq!(labels_of(&targets), vec!['s', 'a']);
    }

    #[test]
    fn test_identity_includes_match_start() {
        let mut cache = LabelCache::new();
        let abc = alphabet("asd");

        cache.update(&[make_match("foo", 1, 1, 0)], &abc);
        // Same word, different matched span: a different target
        let targets = cache.update(&[make_match("foo", 1, 1, 1)], &abc).to_vec();

        assert_eq!(targets[0].label, 's');
    }

    #[test]
    fn test_fresh_values_replace_cached_ones() {
        let mut cache = LabelCache::new();
        let abc = alphabet("a");

        cache.update(&[make_match("foo", 1, 1, 0)], &abc);
        let mut updated = make_match("foo", 1, 1, 0);
        updated.end = 3;
        updated.score = 42;
        let targets = cache.update(&[updated], &abc).to_vec();

        assert_eq!(targets[0].label, 'a');
        assert_eq!(targets[0].end, 3);
        assert_eq!(targets[0].score, 42);
    }

    #[test]
    fn test_alphabet_exhaustion_keeps_earliest() {
        let cache = LabelCache::new();
        let results: Vec<MatchResult> = (1..=5).map(|line| make_match("w", line, 1, 0)).collect();

        let targets = cache.assign(&results, &alphabet("as"));
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].pos.line, 1);
        assert_eq!(targets[1].pos.line, 2);
    }

    #[test]
    fn test_cached_targets_survive_exhaustion() {
        let mut cache = LabelCache::new();
        let abc = alphabet("as");

        cache.update(&[make_match("late", 9, 1, 0)], &abc);
        let targets = cache
            .update(
                &[
                    make_match("one", 1, 1, 0),
                    make_match("two", 2, 1, 0),
                    make_match("late", 9, 1, 0),
                ],
                &abc,
            )
            .to_vec();

        // 'a' is reserved by "late", so only one new target fits
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].text, "one");
        assert_eq!(targets[0].label, 's');
        assert_eq!(targets[1].text, "late");
        assert_eq!(targets[1].label, 'a');
    }

    #[test]
    fn test_vanished_label_reserved_for_one_pass() {
        let mut cache = LabelCache::new();
        let abc = alphabet("as");

        cache.update(
            &[make_match("keep", 1, 1, 0), make_match("gone", 2, 1, 0)],
            &abc,
        );

        // "gone" vanished but its 's' was in use last pass
        let second = cache
            .update(
                &[make_match("keep", 1, 1, 0), make_match("new", 3, 1, 0)],
                &abc,
            )
            .to_vec();
        assert_eq!(labels_of(&second), vec!['a']);

        // Next pass the slot is free again
        let third = cache
            .update(
                &[make_match("keep", 1, 1, 0), make_match("new", 3, 1, 0)],
                &abc,
            )
            .to_vec();
        assert_eq!(labels_of(&third), vec!['a', 's']);
    }

    #[test]
    fn test_reset_forgets_assignments() {
        let mut cache = LabelCache::new();
        let abc = alphabet("asd");

        cache.update(
            &[make_match("foo", 1, 1, 0), make_match("bar", 1, 5, 0)],
            &abc,
        );
        cache.reset();
        assert!(cache.is_empty());

        let targets = cache.update(&[make_match("bar", 1, 5, 0)], &abc).to_vec();
        assert_eq!(targets[0].label, 'a');
    }

    #[test]
    fn test_find_by_label() {
        let mut cache = LabelCache::new();
        cache.update(
            &[make_match("foo", 1, 1, 0), make_match("bar", 1, 5, 0)],
            &alphabet("as"),
        );

        assert_eq!(cache.find('s').map(|t| t.text.as_str()), Some("bar"));
        assert!(cache.find('d').is_none());
    }

    #[test]
    fn test_target_jump_pos_and_matched_text() {
        let mut m = make_match("foobar", 4, 7, 3);
        m.end = 6;
        let targets = LabelCache::new().assign(&[m], &alphabet("a"));

        assert_eq!(targets[0].jump_pos(), Position::new(4, 10));
        assert_eq!(targets[0].matched_text(), "bar");
    }

    #[test]
    fn test_alphabet_rejects_empty_and_duplicates() {
        assert!(LabelAlphabet::new(&["a", ""]).is_err());
        assert!(LabelAlphabet::new::<&str>(&[]).is_err());

        let err = LabelAlphabet::from_chars("asa").unwrap_err();
        assert!(err.message.contains("'a'"));
    }

    #[test]
    fn test_alphabet_uses_first_char_of_label() {
        let abc = LabelAlphabet::new(&["as", "df"]).unwrap();
        assert_eq!(abc.chars(), &['a', 'd']);
        assert!(abc.contains('d'));
        assert!(!abc.contains('s'));
    }

    #[test]
    fn test_format_targets() {
        let targets = LabelCache::new().assign(
            &[make_match("foo", 1, 1, 0), make_match("bar", 2, 3, 0)],
            &alphabet("as"),
        );

        let formatted = format_targets(&targets);
        assert_eq!(formatted, "a=foo@1:1, s=bar@2:3");
        assert_eq!(format_targets(&[]), "(none)");
    }

    #[test]
    fn test_format_targets_truncates() {
        let results: Vec<MatchResult> = (1..=12).map(|line| make_match("w", line, 1, 0)).collect();
        let targets = LabelCache::new().assign(&results, &alphabet("abcdefghijkl"));

        assert!(format_targets(&targets).ends_with("... and 2 more"));
    }
}
