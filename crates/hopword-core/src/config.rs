//! Navigation settings and where they come from.
//!
//! Priority for the configuration file:
//! 1. An explicit path (the CLI's `--config`)
//! 2. `HOPWORD_CONFIG` (ignored when empty)
//! 3. `<config_dir>/hopword/config.json`, when it exists
//! 4. Built-in defaults
//!
//! The file is JSON; every field is optional.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::labels::LabelAlphabet;
use crate::matcher::MatcherKind;
use crate::word::WordExtractor;

pub const CONFIG_ENV: &str = "HOPWORD_CONFIG";

const DEFAULT_LABELS: &str = "asdfghjklqwertyuiopzxcvbnm";

/// Raw, user-editable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Regexes producing candidate words, applied in order on each line.
    pub word_patterns: Vec<String>,
    /// Regexes a word must all match to be kept.
    pub filter_patterns: Vec<String>,
    /// Label keys; only the first char of each entry is used.
    pub labels: Vec<String>,
    /// Enabled match engines, highest priority first.
    pub matchers: Vec<String>,
    /// Jump as soon as typing leaves exactly one target.
    pub auto_jump: bool,
    pub disable_match_highlight: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            word_patterns: vec![r"\w+".to_string()],
            filter_patterns: Vec::new(),
            labels: DEFAULT_LABELS.chars().map(String::from).collect(),
            matchers: vec!["fuzzy".to_string(), "transliteration".to_string()],
            auto_jump: true,
            disable_match_highlight: false,
        }
    }
}

/// Settings compiled and checked, ready for a session.
#[derive(Debug, Clone)]
pub struct NavSettings {
    pub extractor: WordExtractor,
    pub alphabet: LabelAlphabet,
    pub matchers: Vec<MatcherKind>,
    pub auto_jump: bool,
    pub highlight: bool,
}

impl NavConfig {
    /// Compile patterns, labels and matcher names, failing on the first
    /// invalid entry.
    pub fn validate(&self) -> Result<NavSettings, ApiError> {
        let extractor = WordExtractor::new(&self.word_patterns, &self.filter_patterns)?;
        let alphabet = LabelAlphabet::new(&self.labels)?;
        let matchers = self
            .matchers
            .iter()
            .map(|name| name.parse::<MatcherKind>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NavSettings {
            extractor,
            alphabet,
            matchers,
            auto_jump: self.auto_jump,
            highlight: !self.disable_match_highlight,
        })
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_config(format!("Malformed configuration: {}", e)))
    }

    /// Load from the highest-priority source available.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApiError> {
        let Some(path) = config_path(explicit) else {
            debug!("No configuration file, using defaults");
            return Ok(Self::default());
        };

        debug!("Loading configuration from {:?}", path);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            ApiError::invalid_config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

/// Resolve which configuration file to read, if any.
///
/// Explicit and environment paths are returned even if missing so the
/// read error names them; the default location only counts if it exists.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("hopword").join("config.json"))
        .filter(|path| path.is_file())
}
