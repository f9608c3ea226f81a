//! Merging of match results from several engines.
//!
//! Engines run in configured order and their outputs are concatenated. The
//! same spot in the buffer can be hit by more than one engine (or by two
//! overlapping words), so the merged list is deduplicated on the effective
//! match position. The first occurrence wins; scores are never compared
//! across engines.

use std::collections::HashSet;

use tracing::trace;

use crate::matcher::{MatchResult, MatcherKind};
use crate::word::Word;

/// Run every enabled engine and merge the results in priority order.
///
/// Empty input yields an empty list without running any engine.
pub fn aggregate(input: &str, words: &[Word], matchers: &[MatcherKind]) -> Vec<MatchResult> {
    if input.is_empty() {
        return Vec::new();
    }

    let merged: Vec<MatchResult> = matchers
        .iter()
        .flat_map(|kind| {
            let results = kind.find_matches(input, words);
            trace!("{} matched {} words for {:?}", kind, results.len(), input);
            results
        })
        .collect();

    dedup_matches(merged)
}

/// Drop every result whose effective position was already seen.
///
/// Order-preserving and idempotent.
pub fn dedup_matches(results: Vec<MatchResult>) -> Vec<MatchResult> {
    if results.len() <= 1 {
        return results;
    }

    let mut seen = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|r| seen.insert(r.effective_pos()))
        .collect()
}
