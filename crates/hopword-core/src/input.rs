//! Raw key codes and their meaning inside a navigation session.
//!
//! The session consumes one integer key code at a time:
//!
//! | Code | Event |
//! |------|-------|
//! | 13 | Enter |
//! | 27 | Escape |
//! | 8, 128 | Backspace |
//! | 23 (Ctrl+W) | Clear the whole input |
//! | 32..=126 | Printable character |
//!
//! Everything else is ignored. Scripted sessions describe their keys as
//! space-separated names (`"f o Enter"`), parsed by [`parse_key_sequence`].

pub const ENTER: u32 = 13;
pub const ESCAPE: u32 = 27;
pub const BACKSPACE: u32 = 8;
pub const BACKSPACE_ALT: u32 = 128;
pub const CLEAR_WORD: u32 = 23;

/// A decoded key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Enter,
    Escape,
    Backspace,
    ClearWord,
    /// Printable ASCII character.
    Char(char),
    /// Anything else, ignored by the session.
    Other(u32),
}

impl InputEvent {
    pub fn from_code(code: u32) -> Self {
        match code {
            ENTER => InputEvent::Enter,
            ESCAPE => InputEvent::Escape,
            BACKSPACE | BACKSPACE_ALT => InputEvent::Backspace,
            CLEAR_WORD => InputEvent::ClearWord,
            32..=126 => match char::from_u32(code) {
                Some(c) => InputEvent::Char(c),
                None => InputEvent::Other(code),
            },
            _ => InputEvent::Other(code),
        }
    }
}

/// Code of a named key, or None if not recognized.
///
/// Note: Internal function. Use `parse_key_sequence` for the public API.
fn key_to_code(key: &str) -> Option<u32> {
    let code = match key.to_lowercase().as_str() {
        "enter" | "return" | "cr" => ENTER,
        "escape" | "esc" => ESCAPE,
        "backspace" | "bs" => BACKSPACE,
        "space" => 32,
        "plus" => '+' as u32, // + is the combo separator
        "tab" => 9,
        _ => return None,
    };
    Some(code)
}

/// Parse a combo like "Ctrl+W" into its control code.
///
/// Note: Internal function. Use `parse_key_sequence` for the public API.
fn parse_key_combo(combo: &str) -> Option<u32> {
    let (modifier, key) = combo.split_once('+')?;
    if !matches!(modifier.to_lowercase().as_str(), "ctrl" | "control") {
        return None;
    }

    let mut chars = key.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return None,
    };

    if c.is_ascii_alphabetic() {
        // Ctrl+A = 0x01, ..., Ctrl+Z = 0x1A
        Some(u32::from(c.to_ascii_uppercase() as u8 - b'A' + 1))
    } else {
        match c {
            '[' => Some(ESCAPE),
            '?' => Some(127),
            _ => None,
        }
    }
}

/// Parse a sequence like "f o Ctrl+W b Enter" into key codes.
///
/// Keys are space-separated. Each key can be a combo (`Ctrl+W`), a named
/// key (`Enter`, `Escape`, `Backspace`, `Space`) or a single character.
///
/// # Examples
///
/// ```
/// use hopword_core::input::parse_key_sequence;
///
/// let codes = parse_key_sequence("f o Enter").unwrap();
/// assert_eq!(codes, vec![102, 111, 13]);
/// ```
pub fn parse_key_sequence(sequence: &str) -> Option<Vec<u32>> {
    let parts: Vec<&str> = sequence.split_whitespace().collect();

    if parts.is_empty() {
        return None;
    }

    parts
        .into_iter()
        .map(|part| {
            parse_key_combo(part)
                .or_else(|| key_to_code(part))
                .or_else(|| {
                    let mut chars = part.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c as u32),
                        _ => None,
                    }
                })
        })
        .collect()
}

/// Human-readable name of a key code, for logs.
pub fn describe_code(code: u32) -> String {
    match InputEvent::from_code(code) {
        InputEvent::Enter => "Enter".to_string(),
        InputEvent::Escape => "Escape".to_string(),
        InputEvent::Backspace => "Backspace".to_string(),
        InputEvent::ClearWord => "Ctrl+W".to_string(),
        InputEvent::Char(' ') => "Space".to_string(),
        InputEvent::Char(c) => c.to_string(),
        InputEvent::Other(code) => format!("<{}>", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_named_events() {
        assert_eq!(InputEvent::from_code(13), InputEvent::Enter);
        assert_eq!(InputEvent::from_code(27), InputEvent::Escape);
        assert_eq!(InputEvent::from_code(8), InputEvent::Backspace);
        assert_eq!(InputEvent::from_code(128), InputEvent::Backspace);
        assert_eq!(InputEvent::from_code(23), InputEvent::ClearWord);
    }

    #[test]
    fn test_from_code_printable_range() {
        assert_eq!(InputEvent::from_code(32), InputEvent::Char(' '));
        assert_eq!(InputEvent::from_code(102), InputEvent::Char('f'));
        assert_eq!(InputEvent::from_code(126), InputEvent::Char('~'));
    }

    #[test]
    fn test_from_code_other() {
        assert_eq!(InputEvent::from_code(9), InputEvent::Other(9));
        assert_eq!(InputEvent::from_code(127), InputEvent::Other(127));
        assert_eq!(InputEvent::from_code(233), InputEvent::Other(233));
    }

    #[test]
    fn test_key_to_code_case_insensitive() {
        assert_eq!(key_to_code("Enter"), Some(13));
        assert_eq!(key_to_code("ESC"), Some(27));
        assert_eq!(key_to_code("backspace"), Some(8));
        assert_eq!(key_to_code("NotAKey"), None);
    }

    #[test]
    fn test_parse_key_combo_ctrl() {
        assert_eq!(parse_key_combo("Ctrl+W"), Some(23));
        assert_eq!(parse_key_combo("ctrl+h"), Some(8));
        assert_eq!(parse_key_combo("Ctrl+["), Some(27));
        assert_eq!(parse_key_combo("Alt+W"), None);
        assert_eq!(parse_key_combo("Ctrl+Enter"), None);
    }

    #[test]
    fn test_parse_key_sequence() {
        let codes = parse_key_sequence("f o Ctrl+W Backspace Space Escape").unwrap();
        assert_eq!(codes, vec![102, 111, 23, 8, 32, 27]);
    }

    #[test]
    fn test_parse_key_sequence_plus_alias() {
        assert_eq!(parse_key_sequence("plus +").unwrap(), vec![43, 43]);
    }

    #[test]
    fn test_parse_key_sequence_empty_returns_none() {
        assert!(parse_key_sequence("").is_none());
        assert!(parse_key_sequence("   ").is_none());
    }

    #[test]
    fn test_parse_key_sequence_invalid_key_returns_none() {
        assert!(parse_key_sequence("f NotAKey").is_none());
    }

    #[test]
    fn test_describe_code() {
        assert_eq!(describe_code(13), "Enter");
        assert_eq!(describe_code(23), "Ctrl+W");
        assert_eq!(describe_code(32), "Space");
        assert_eq!(describe_code(120), "x");
        assert_eq!(describe_code(1), "<1>");
    }
}
