//! Serializable results of a navigation session.

use serde::{Deserialize, Serialize};

use crate::labels::Target;
use crate::overlay::Frame;
use crate::word::Position;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The cursor moved to `target`.
    Jumped { target: Target },
    /// Escape, or the key source ran dry.
    Cancelled,
    /// Enter pressed while nothing matched.
    NoTarget,
}

impl Outcome {
    pub fn target(&self) -> Option<&Target> {
        match self {
            Outcome::Jumped { target } => Some(target),
            _ => None,
        }
    }
}

/// Everything a scripted run reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpReport {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Cursor position after the session.
    pub cursor: Position,
    /// Where the cursor was before the jump.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_back: Option<Position>,
    /// Every frame flushed during the session, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target {
            text: "foo".into(),
            start: 0,
            end: 3,
            pos: Position::new(3, 1),
            score: 7,
            label: 'a',
        }
    }

    #[test]
    fn test_outcome_tagging() {
        let json = serde_json::to_string(&Outcome::NoTarget).unwrap();
        assert_eq!(json, r#"{"outcome":"no_target"}"#);

        let json = serde_json::to_string(&Outcome::Jumped { target: target() }).unwrap();
        assert!(json.contains(r#""outcome":"jumped""#));
        assert!(json.contains(r#""label":"a""#));
    }

    #[test]
    fn test_report_flattens_outcome() {
        let report = JumpReport {
            outcome: Outcome::Cancelled,
            cursor: Position::new(1, 1),
            jump_back: None,
            frames: None,
        };
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains(r#""outcome":"cancelled""#));
        assert!(!json.contains("jump_back"));
        assert!(!json.contains("frames"));
    }

    #[test]
    fn test_report_round_trip() {
        let report = JumpReport {
            outcome: Outcome::Jumped { target: target() },
            cursor: Position::new(3, 1),
            jump_back: Some(Position::new(1, 1)),
            frames: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: JumpReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back, report);
        assert_eq!(back.outcome.target().map(|t| t.label), Some('a'));
    }
}
