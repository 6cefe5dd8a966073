mod buffer;
mod cursor;
mod keymap;
mod mode;
mod viewport;

pub use buffer::Buffer;
pub use cursor::Cursor;
pub use keymap::{key_text, KeyAction, Keymap, Keystroke};
pub use mode::{CursorStyle, InsertMode, Mode, NormalMode};
pub use viewport::Viewport;

use anyhow::{bail, Result};
use crossterm::event::KeyEvent;
use log::debug;

use crate::config::Config;

/// Receipt for a pushed cursor style. Popping requires the token, which
/// records the stack depth the push created; a mismatch means some mode
/// skipped its teardown and is reported as an error instead of silently
/// corrupting the rendered cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleToken(usize);

impl StyleToken {
    #[cfg(test)]
    pub(crate) fn floor() -> Self {
        StyleToken(1)
    }
}

/// The editing context every mode operates on: the buffer, the cursor, the
/// cursor-style stack and the slot holding the active mode. Exactly one mode
/// is active at a time; only mode entry/exit actions replace the slot.
pub struct Editor {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub viewport: Viewport,
    pub config: Config,
    pub status_message: String,
    pub should_quit: bool,
    cursor_styles: Vec<CursorStyle>,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mode = Mode::normal(&config.key_bindings);
        Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            mode,
            viewport: Viewport::new(),
            config,
            status_message: String::new(),
            should_quit: false,
            // The base style never pops; it is what Normal mode renders as.
            cursor_styles: vec![CursorStyle::Block],
        }
    }

    pub fn load_file(&mut self, path: &str) -> Result<()> {
        self.buffer.load_file(path)?;
        self.cursor = Cursor::new();
        self.viewport.reset();
        self.status_message = format!("\"{}\"", path);
        Ok(())
    }

    /// Route one key through the active mode: exact-match lookup in its
    /// mapping table first, then the mode's fallback handler. Returns
    /// whether the key was consumed; `Err` only for editor-contract
    /// violations, never for merely unmapped keys.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let keystroke = Keystroke::from_event(&key);
        if let Some(action) = self.mode.lookup(&keystroke) {
            return action(self);
        }

        let fallback = match self.mode {
            Mode::Normal(_) => mode::on_unmapped_normal,
            Mode::Insert(_) => mode::on_unmapped_insert,
        };
        fallback(self, &key)
    }

    /// Push a style; the returned token must be handed back to
    /// `pop_cursor_style` when the pushing mode is torn down.
    pub fn push_cursor_style(&mut self, style: CursorStyle) -> StyleToken {
        self.cursor_styles.push(style);
        debug!(
            "Pushed cursor style {:?} (depth {})",
            style,
            self.cursor_styles.len()
        );
        StyleToken(self.cursor_styles.len())
    }

    /// Pop the style the token refers to. The token must name the current
    /// top of the stack; anything else is a mode-lifecycle bug.
    pub fn pop_cursor_style(&mut self, token: StyleToken) -> Result<CursorStyle> {
        if self.cursor_styles.len() != token.0 {
            bail!(
                "Cursor style stack is unbalanced: depth {} but popping entry {}",
                self.cursor_styles.len(),
                token.0
            );
        }
        match self.cursor_styles.pop() {
            Some(style) => Ok(style),
            None => bail!("Cursor style stack underflow"),
        }
    }

    /// The style to render with: whatever was pushed last.
    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_styles
            .last()
            .copied()
            .unwrap_or(CursorStyle::Block)
    }

    pub(crate) fn cursor_style_depth(&self) -> usize {
        self.cursor_styles.len()
    }

    /// Swap to Insert mode: push its cursor style, then replace the mode
    /// slot with a fresh InsertMode holding the style token.
    pub fn enter_insert_mode(&mut self) {
        let token = self.push_cursor_style(CursorStyle::Bar);
        self.mode = Mode::Insert(InsertMode::new(&self.config.key_bindings, token));
    }

    /// Swap back to Normal mode, releasing the style Insert pushed on
    /// entry. A no-op outside Insert mode.
    pub fn leave_insert_mode(&mut self) -> Result<()> {
        let token = match &self.mode {
            Mode::Insert(insert) => insert.style_token(),
            Mode::Normal(_) => return Ok(()),
        };
        self.pop_cursor_style(token)?;
        self.mode = Mode::normal(&self.config.key_bindings);
        Ok(())
    }

    /// Keep the cursor inside the visible window after it moved.
    pub fn sync_viewport(&mut self) {
        let column = self.cursor.column(&self.buffer);
        self.viewport.ensure_visible(self.cursor.y, column);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
