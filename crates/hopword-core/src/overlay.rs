//! Plain-text rendering of labels over a viewport.
//!
//! [`TextRenderer`] draws into memory: every flush captures a [`Frame`]
//! holding the prompt and the viewport lines with each target's label
//! written over the first matched character. With highlighting on, matched
//! spans are wrapped in brackets:
//!
//! ```text
//! prompt: fo
//! let [aoo] = [sood];
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::labels::Target;
use crate::session::Renderer;
use crate::word::Viewport;

/// What the screen showed at one flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Whether the viewport was dimmed behind the labels.
    pub shaded: bool,
    pub lines: Vec<String>,
    #[serde(skip)]
    pub targets: Vec<Target>,
}

/// In-memory renderer that records every flushed frame.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    viewport: Viewport,
    prompt: Option<String>,
    shaded: bool,
    mounted: Vec<Target>,
    highlight: bool,
    frames: Vec<Frame>,
}

impl TextRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// The frame the next flush would capture.
    pub fn compose(&self) -> Frame {
        let lines = self
            .viewport
            .lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let line_no = self.viewport.first_line + idx;
                compose_line(line, line_no, &self.mounted, self.highlight)
            })
            .collect();

        Frame {
            prompt: self.prompt.clone(),
            shaded: self.shaded,
            lines,
            targets: self.mounted.clone(),
        }
    }
}

fn compose_line(line: &str, line_no: usize, targets: &[Target], highlight: bool) -> String {
    let mut labels: HashMap<usize, char> = HashMap::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for target in targets.iter().filter(|t| t.pos.line == line_no) {
        let base = target.pos.col.saturating_sub(1);
        labels.insert(base + target.start, target.label);
        if highlight {
            spans.push((base + target.start, base + target.end));
        }
    }

    if labels.is_empty() {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + spans.len() * 2);
    let mut in_span = false;
    for (byte, c) in line.char_indices() {
        let lit = spans.iter().any(|&(start, end)| byte >= start && byte < end);
        if lit != in_span {
            out.push(if lit { '[' } else { ']' });
            in_span = lit;
        }
        out.push(labels.get(&byte).copied().unwrap_or(c));
    }
    if in_span {
        out.push(']');
    }
    out
}

impl Renderer for TextRenderer {
    fn prompt(&mut self, input: &str) -> Result<(), SessionError> {
        self.prompt = Some(input.to_string());
        self.shaded = true;
        Ok(())
    }

    fn mount(&mut self, targets: &[Target], highlight: bool) -> Result<(), SessionError> {
        self.mounted = targets.to_vec();
        self.highlight = highlight;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), SessionError> {
        self.mounted.clear();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SessionError> {
        let frame = self.compose();
        self.frames.push(frame);
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SessionError> {
        self.prompt = None;
        self.shaded = false;
        self.mounted.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Position;

    fn target(label: char, line: usize, col: usize, start: usize, end: usize) -> Target {
        Target {
            text: String::new(),
            start,
            end,
            pos: Position::new(line, col),
            score: 0,
            label,
        }
    }

    fn renderer(lines: &[&str]) -> TextRenderer {
        TextRenderer::new(Viewport::new(1, lines.iter().map(|l| l.to_string()).collect()))
    }

    #[test]
    fn test_label_replaces_match_start() {
        let mut r = renderer(&["let foo = food;"]);
        let targets = [target('a', 1, 5, 0, 2), target('s', 1, 11, 0, 2)];
        r.mount(&targets, false).unwrap();

        assert_eq!(r.compose().lines, vec!["let aoo = sood;"]);
    }

    #[test]
    fn test_highlight_brackets_span() {
        let mut r = renderer(&["xfoo bar"]);
        r.mount(&[target('a', 1, 1, 1, 3)], true).unwrap();

        assert_eq!(r.compose().lines, vec!["x[ao]o bar"]);
    }

    #[test]
    fn test_highlight_span_at_line_end() {
        let mut r = renderer(&["foo"]);
        r.mount(&[target('a', 1, 1, 0, 3)], true).unwrap();

        assert_eq!(r.compose().lines, vec!["[aoo]"]);
    }

    #[test]
    fn test_only_targets_on_line_are_drawn() {
        let mut r = TextRenderer::new(Viewport::new(10, vec!["one".into(), "two".into()]));
        r.mount(&[target('k', 11, 1, 0, 1)], false).unwrap();

        assert_eq!(r.compose().lines, vec!["one", "kwo"]);
    }

    #[test]
    fn test_mount_empty_is_fine() {
        let mut r = renderer(&["foo"]);
        r.mount(&[], true).unwrap();
        r.flush().unwrap();

        assert_eq!(r.frames()[0].lines, vec!["foo"]);
    }

    #[test]
    fn test_teardown_clears_everything() {
        let mut r = renderer(&["foo"]);
        r.prompt("f").unwrap();
        r.mount(&[target('a', 1, 1, 0, 1)], false).unwrap();
        r.flush().unwrap();
        r.teardown().unwrap();
        r.flush().unwrap();

        let frames = r.into_frames();
        assert_eq!(frames[0].prompt.as_deref(), Some("f"));
        assert!(frames[0].shaded);
        assert_eq!(frames[0].lines, vec!["aoo"]);

        assert_eq!(frames[1].prompt, None);
        assert!(!frames[1].shaded);
        assert_eq!(frames[1].lines, vec!["foo"]);
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut r = renderer(&["foo"]);
        r.unmount().unwrap();
        r.unmount().unwrap();
        assert!(r.compose().targets.is_empty());
    }
}
