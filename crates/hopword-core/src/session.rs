//! The interactive navigation session.
//!
//! A session extracts the visible words once, then loops:
//!
//! 1. show the input as a prompt, unmount the previous labels
//! 2. recompute targets (aggregate + label) and mount them, flush
//! 3. block for one key code and apply it
//!
//! until a jump, a cancel, or an error. Whatever ends the loop, the labels,
//! shading and prompt are torn down: the renderer lives in a guard whose
//! `Drop` performs the cleanup.
//!
//! The only state carried between cycles is [`SessionState`]: the input and
//! the label cache, which each cycle replaces wholesale.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate;
use crate::config::NavSettings;
use crate::error::{ApiError, SessionError};
use crate::input::{describe_code, parse_key_sequence, InputEvent};
use crate::labels::{format_targets, LabelCache, Target};
use crate::protocol::Outcome;
use crate::word::{Viewport, Word};

/// Paints targets and the input prompt.
///
/// Every method must be idempotent, and `mount(&[])` must be accepted.
pub trait Renderer {
    /// Show the current input.
    fn prompt(&mut self, input: &str) -> Result<(), SessionError>;
    /// Show `targets`, highlighting matched spans when `highlight` is set.
    fn mount(&mut self, targets: &[Target], highlight: bool) -> Result<(), SessionError>;
    /// Remove every label and highlight.
    fn unmount(&mut self) -> Result<(), SessionError>;
    /// Push pending drawing to the screen.
    fn flush(&mut self) -> Result<(), SessionError>;
    /// Clear viewport shading and the prompt; force a full redraw.
    fn teardown(&mut self) -> Result<(), SessionError>;
}

/// Moves the cursor to a chosen target.
pub trait CursorJumper {
    fn jump(&mut self, target: &Target) -> Result<(), SessionError>;
}

/// Supplies key codes, blocking until one is available.
pub trait KeySource {
    /// `None` once the source is exhausted.
    fn next_code(&mut self) -> Result<Option<u32>, SessionError>;
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn prompt(&mut self, input: &str) -> Result<(), SessionError> {
        (**self).prompt(input)
    }

    fn mount(&mut self, targets: &[Target], highlight: bool) -> Result<(), SessionError> {
        (**self).mount(targets, highlight)
    }

    fn unmount(&mut self) -> Result<(), SessionError> {
        (**self).unmount()
    }

    fn flush(&mut self) -> Result<(), SessionError> {
        (**self).flush()
    }

    fn teardown(&mut self) -> Result<(), SessionError> {
        (**self).teardown()
    }
}

impl<T: CursorJumper + ?Sized> CursorJumper for &mut T {
    fn jump(&mut self, target: &Target) -> Result<(), SessionError> {
        (**self).jump(target)
    }
}

/// Key codes from a pre-parsed script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    codes: VecDeque<u32>,
}

impl ScriptedKeys {
    pub fn new(codes: Vec<u32>) -> Self {
        Self {
            codes: codes.into(),
        }
    }

    /// Parse a key sequence such as `"f o Enter"`.
    pub fn parse(sequence: &str) -> Result<Self, ApiError> {
        parse_key_sequence(sequence).map(Self::new).ok_or_else(|| {
            ApiError::invalid_input_with_suggestion(
                format!("Invalid key sequence '{}'", sequence),
                "Use space-separated keys such as \"f o Ctrl+W Enter\"",
            )
        })
    }

    /// Codes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.codes.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_code(&mut self) -> Result<Option<u32>, SessionError> {
        Ok(self.codes.pop_front())
    }
}

/// State carried from one cycle to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub input: String,
    pub cache: LabelCache,
}

/// Compute the next label cache for `input`.
///
/// Pure: the previous cache is only read. The returned cache's targets are
/// what the cycle displays.
pub fn recompute(
    cache: &LabelCache,
    input: &str,
    words: &[Word],
    settings: &NavSettings,
) -> LabelCache {
    let results = aggregate(input, words, &settings.matchers);
    LabelCache::from(cache.assign(&results, &settings.alphabet))
}

/// Result of applying one key code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Exit(Outcome),
}

/// Owns the renderer for the lifetime of a session and tears the display
/// down when dropped.
struct MountGuard<R: Renderer> {
    renderer: R,
}

impl<R: Renderer> Deref for MountGuard<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer> DerefMut for MountGuard<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer> Drop for MountGuard<R> {
    fn drop(&mut self) {
        if let Err(e) = self.renderer.unmount() {
            warn!("Failed to unmount labels during cleanup: {}", e);
        }
        if let Err(e) = self.renderer.teardown() {
            warn!("Failed to tear down display during cleanup: {}", e);
        }
        if let Err(e) = self.renderer.flush() {
            warn!("Failed to flush display during cleanup: {}", e);
        }
    }
}

/// One navigation session over a fixed set of words.
pub struct NavSession<'a, R: Renderer, J: CursorJumper> {
    settings: &'a NavSettings,
    words: Vec<Word>,
    state: SessionState,
    view: MountGuard<R>,
    jumper: J,
}

impl<'a, R: Renderer, J: CursorJumper> NavSession<'a, R, J> {
    /// Start a session on the words visible in `viewport`.
    pub fn start(settings: &'a NavSettings, viewport: &Viewport, renderer: R, jumper: J) -> Self {
        let words = settings.extractor.extract(viewport);
        Self::with_words(settings, words, renderer, jumper)
    }

    /// Start a session on an already extracted word list.
    pub fn with_words(settings: &'a NavSettings, words: Vec<Word>, renderer: R, jumper: J) -> Self {
        debug!("Session started with {} candidate words", words.len());
        Self {
            settings,
            words,
            state: SessionState::default(),
            view: MountGuard { renderer },
            jumper,
        }
    }

    pub fn input(&self) -> &str {
        &self.state.input
    }

    /// Targets of the last completed cycle.
    pub fn targets(&self) -> &[Target] {
        self.state.cache.targets()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn renderer(&self) -> &R {
        &self.view
    }

    /// Run one render cycle: prompt, unmount, recompute, mount, flush.
    pub fn refresh(&mut self) -> Result<&[Target], SessionError> {
        self.view.prompt(&self.state.input)?;
        self.view.unmount()?;

        self.state.cache = recompute(
            &self.state.cache,
            &self.state.input,
            &self.words,
            self.settings,
        );
        debug!(
            "Input {:?}: {} targets [{}]",
            self.state.input,
            self.state.cache.len(),
            format_targets(self.state.cache.targets())
        );

        let highlight = self.settings.highlight;
        self.view.mount(self.state.cache.targets(), highlight)?;
        self.view.flush()?;
        Ok(self.state.cache.targets())
    }

    /// Apply one key code to the session.
    pub fn handle_code(&mut self, code: u32) -> Result<Transition, SessionError> {
        let event = InputEvent::from_code(code);
        debug!("Key {}", describe_code(code));

        match event {
            InputEvent::Enter => {
                return match self.targets().first().cloned() {
                    Some(target) => self.jump(target),
                    None => {
                        info!("Enter with no targets, leaving");
                        Ok(Transition::Exit(Outcome::NoTarget))
                    }
                };
            }
            InputEvent::Escape => {
                info!("Navigation cancelled");
                return Ok(Transition::Exit(Outcome::Cancelled));
            }
            _ => {}
        }

        let labeled = char::from_u32(code)
            .filter(|c| self.settings.alphabet.contains(*c))
            .and_then(|c| self.state.cache.find(c))
            .cloned();
        if let Some(target) = labeled {
            return self.jump(target);
        }

        match event {
            InputEvent::Backspace => {
                self.state.cache.reset();
                self.state.input.pop();
            }
            InputEvent::ClearWord => {
                self.state.cache.reset();
                self.state.input.clear();
            }
            InputEvent::Char(c) => {
                self.state.input.push(c);
                if self.settings.auto_jump {
                    if let Some(target) = self.sole_target() {
                        return self.jump(target);
                    }
                }
            }
            _ => {}
        }

        Ok(Transition::Continue)
    }

    /// Run cycles until the session exits.
    ///
    /// The display is torn down before this returns, on success and error.
    pub fn run<K: KeySource + ?Sized>(mut self, keys: &mut K) -> Result<Outcome, SessionError> {
        let result = self.run_loop(keys);
        if let Err(e) = &result {
            error!("Navigation aborted: {}", e);
        }
        result
    }

    fn run_loop<K: KeySource + ?Sized>(&mut self, keys: &mut K) -> Result<Outcome, SessionError> {
        loop {
            self.refresh()?;

            let Some(code) = keys.next_code()? else {
                info!("Key source exhausted, cancelling");
                return Ok(Outcome::Cancelled);
            };

            if let Transition::Exit(outcome) = self.handle_code(code)? {
                return Ok(outcome);
            }
        }
    }

    /// The single target the current input would produce, if exactly one.
    ///
    /// Does not touch the cache; the next cycle commits the labels.
    fn sole_target(&self) -> Option<Target> {
        let settings = self.settings;
        let results = aggregate(&self.state.input, &self.words, &settings.matchers);
        let mut targets = self.state.cache.assign(&results, &settings.alphabet);
        if targets.len() == 1 {
            targets.pop()
        } else {
            None
        }
    }

    fn jump(&mut self, target: Target) -> Result<Transition, SessionError> {
        info!("Jumping to {} ({:?})", target.jump_pos(), target.text);
        self.jumper.jump(&target)?;
        Ok(Transition::Exit(Outcome::Jumped { target }))
    }
}
