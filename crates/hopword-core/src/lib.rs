//! Core types and logic for hopword.
//!
//! hopword labels the words of a visible text region so the cursor can
//! jump to any of them in a couple of keystrokes. As the user types, the
//! input is matched against every word, matches are deduplicated, and each
//! surviving match gets a one-key label that stays put while it remains a
//! match.
//!
//! # Modules
//!
//! - [`word`]: Positions, viewports and regex word extraction
//! - [`matcher`]: Fuzzy and transliteration match engines
//! - [`aggregate`]: Merging engine results with positional dedup
//! - [`labels`]: Label alphabet and the stable label cache
//! - [`input`]: Key codes and key sequence parsing
//! - [`session`]: The interactive state machine and its seams
//! - [`overlay`]: In-memory renderer that records frames
//! - [`cursor`]: Buffer cursor with a jump-back mark
//! - [`config`]: User settings and where they are loaded from
//! - [`protocol`]: Serializable session outcomes
//! - [`error`]: Error types with actionable suggestions
//!
//! # Label stability
//!
//! | Input | Matches | Labels |
//! |-------|---------|--------|
//! | `f` | `foo`, `far`, `fizz` | `a`, `s`, `d` |
//! | `fo` | `foo` | `a` |
//! | `f` | `foo`, `far`, `fizz` | `a`, `f`, `g` |
//!
//! A match keeps its label for as long as it stays in the result set.
//! Labels held by matches that just dropped out are still skipped on the
//! keystroke they disappear, so new matches may get later letters.

pub mod aggregate;
pub mod config;
pub mod cursor;
pub mod error;
pub mod input;
pub mod labels;
pub mod matcher;
pub mod overlay;
pub mod protocol;
pub mod session;
pub mod word;
