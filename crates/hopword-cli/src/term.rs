//! Drawing labels over the real terminal.
//!
//! The viewport is shown on the alternate screen, one buffer line per row,
//! dimmed while a session is active. Labels are drawn in reverse video at
//! the first matched character; the input prompt sits on the last row.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use hopword_core::error::SessionError;
use hopword_core::input::{BACKSPACE, CLEAR_WORD, ENTER, ESCAPE};
use hopword_core::labels::Target;
use hopword_core::session::{KeySource, Renderer};
use hopword_core::word::Viewport;
use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PROMPT: &str = "hop: ";

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Terminal size as (columns, rows), with a fallback when unknown.
pub fn screen_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

fn render_err(e: io::Error) -> SessionError {
    SessionError::Render(e.to_string())
}

/// Display width of `line` up to byte offset `byte`.
fn column_of(line: &str, byte: usize) -> usize {
    line.get(..byte).map(UnicodeWidthStr::width).unwrap_or(0)
}

/// Longest prefix of `text` that fits in `width` columns.
fn clip(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }
    text
}

/// A [`Renderer`] that paints straight to stdout.
pub struct TerminalRenderer {
    out: Stdout,
    viewport: Viewport,
    width: usize,
    prompt_row: u16,
    prompt: Option<String>,
    shaded: bool,
    mounted: Vec<Target>,
    highlight: bool,
}

impl TerminalRenderer {
    pub fn new(viewport: Viewport) -> Self {
        let (cols, rows) = screen_size();
        Self {
            out: io::stdout(),
            viewport,
            width: usize::from(cols),
            prompt_row: rows.saturating_sub(1),
            prompt: None,
            shaded: false,
            mounted: Vec::new(),
            highlight: true,
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;

        let rows = usize::from(self.prompt_row);
        for (idx, line) in self.viewport.lines.iter().take(rows).enumerate() {
            let row = idx as u16;
            queue!(self.out, MoveTo(0, row))?;
            if self.shaded {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
            queue!(
                self.out,
                Print(clip(line, self.width)),
                SetAttribute(Attribute::Reset)
            )?;
        }

        for target in &self.mounted {
            let Some(line) = self.viewport.line(target.pos.line) else {
                continue;
            };
            let idx = target.pos.line - self.viewport.first_line;
            if idx >= rows {
                continue;
            }

            let base = target.pos.col.saturating_sub(1);
            let start = base + target.start;
            let col = column_of(line, start);
            if col >= self.width {
                continue;
            }

            let row = idx as u16;
            if self.highlight {
                // Rest of the matched span, after the label cell
                let label_len = line
                    .get(start..)
                    .and_then(|s| s.chars().next())
                    .map_or(0, char::len_utf8);
                let label_end = start + label_len;
                if let Some(rest) = line.get(label_end..base + target.end) {
                    let rest_col = column_of(line, label_end);
                    queue!(
                        self.out,
                        MoveTo(rest_col as u16, row),
                        SetAttribute(Attribute::Bold),
                        SetAttribute(Attribute::Underlined),
                        Print(clip(rest, self.width.saturating_sub(rest_col))),
                        SetAttribute(Attribute::Reset)
                    )?;
                }
            }
            queue!(
                self.out,
                MoveTo(col as u16, row),
                SetAttribute(Attribute::Reverse),
                Print(target.label),
                SetAttribute(Attribute::Reset)
            )?;
        }

        if let Some(input) = &self.prompt {
            let line = format!("{}{}", PROMPT, input);
            queue!(
                self.out,
                MoveTo(0, self.prompt_row),
                Print(clip(&line, self.width))
            )?;
        }

        self.out.flush()
    }
}

impl Renderer for TerminalRenderer {
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
        self.draw().map_err(render_err)
    }

    fn teardown(&mut self) -> Result<(), SessionError> {
        self.prompt = None;
        self.shaded = false;
        self.mounted.clear();
        Ok(())
    }
}

/// Map a key press to the session's code space.
///
/// Returns None for keys with no code (arrows, function keys, Alt chords).
pub fn key_code(key: &KeyEvent) -> Option<u32> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Enter => Some(ENTER),
        KeyCode::Esc => Some(ESCAPE),
        KeyCode::Backspace => Some(BACKSPACE),
        KeyCode::Tab => Some(9),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if c.eq_ignore_ascii_case(&'w') {
                Some(CLEAR_WORD)
            } else if c.is_ascii_alphabetic() {
                // Ctrl+A = 0x01, ..., Ctrl+Z = 0x1A
                Some(u32::from(c.to_ascii_uppercase() as u8 - b'A' + 1))
            } else {
                None
            }
        }
        KeyCode::Char(c) => Some(u32::from(c)),
        _ => None,
    }
}

/// Key codes read from the terminal, blocking.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_code(&mut self) -> Result<Option<u32>, SessionError> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key_code(&key) {
                    Some(code) => return Ok(Some(code)),
                    None => trace!("Ignoring key {:?}", key.code),
                }
            }
        }
    }
}
