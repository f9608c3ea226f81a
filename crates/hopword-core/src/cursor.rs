//! A cursor that jumps to targets and remembers where it came from.

use crate::error::SessionError;
use crate::labels::Target;
use crate::session::CursorJumper;
use crate::word::Position;

/// Cursor over a buffer, remembering where the last jump started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCursor {
    position: Position,
    jump_back: Option<Position>,
    last_line: Option<usize>,
}

impl Default for BufferCursor {
    fn default() -> Self {
        Self::new(Position::new(1, 1))
    }
}

impl BufferCursor {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            jump_back: None,
            last_line: None,
        }
    }

    /// Refuse jumps past buffer line `last_line`.
    pub fn with_last_line(mut self, last_line: usize) -> Self {
        self.last_line = Some(last_line);
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Position before the last jump, if any.
    pub fn jump_back_mark(&self) -> Option<Position> {
        self.jump_back
    }
}

impl CursorJumper for BufferCursor {
    fn jump(&mut self, target: &Target) -> Result<(), SessionError> {
        let dest = target.jump_pos();
        if let Some(last) = self.last_line {
            if dest.line > last {
                return Err(SessionError::Jump(format!(
                    "line {} is past the end of the buffer ({} lines)",
                    dest.line, last
                )));
            }
        }

        self.jump_back = Some(self.position);
        self.position = dest;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(line: usize, col: usize, start: usize) -> Target {
        Target {
            text: "foobar".into(),
            start,
            end: start + 1,
            pos: Position::new(line, col),
            score: 0,
            label: 'a',
        }
    }

    #[test]
    fn test_jump_lands_on_match_start() {
        let mut cursor = BufferCursor::new(Position::new(1, 1));
        cursor.jump(&target_at(5, 3, 2)).unwrap();

        assert_eq!(cursor.position(), Position::new(5, 5));
        assert_eq!(cursor.jump_back_mark(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_second_jump_moves_mark() {
        let mut cursor = BufferCursor::new(Position::new(2, 4));
        cursor.jump(&target_at(9, 1, 0)).unwrap();
        cursor.jump(&target_at(3, 2, 0)).unwrap();

        assert_eq!(cursor.position(), Position::new(3, 2));
        assert_eq!(cursor.jump_back_mark(), Some(Position::new(9, 1)));
    }

    #[test]
    fn test_no_mark_before_first_jump() {
        let cursor = BufferCursor::default();
        assert_eq!(cursor.jump_back_mark(), None);
        assert_eq!(cursor.position(), Position::new(1, 1));
    }

    #[test]
    fn test_jump_past_last_line_fails_and_stays() {
        let mut cursor = BufferCursor::new(Position::new(2, 1)).with_last_line(4);

        let err = cursor.jump(&target_at(7, 1, 0)).unwrap_err();
        assert!(matches!(err, SessionError::Jump(_)));
        assert!(err.to_string().contains("line 7"));
        assert_eq!(cursor.position(), Position::new(2, 1));
        assert_eq!(cursor.jump_back_mark(), None);
    }

    #[test]
    fn test_jump_onto_last_line_is_allowed() {
        let mut cursor = BufferCursor::default().with_last_line(4);
        cursor.jump(&target_at(4, 1, 0)).unwrap();
        assert_eq!(cursor.position(), Position::new(4, 1));
    }
}
