use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use super::Editor;

/// An action bound to a keystroke. The return value signals whether the key
/// was consumed; `Err` means a contract violation inside the editor, not an
/// unhandled key.
pub type KeyAction = fn(&mut Editor) -> Result<bool>;

/// The lookup key for a mapping table: a key code plus its modifier state.
/// Lookup is exact-match only; there is no prefix or wildcard matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Keystroke {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        // Uppercase characters already carry their case in the code, so the
        // SHIFT bit would make the same chord hash two different ways
        // depending on the terminal. Normalize it away for character keys.
        let mut modifiers = modifiers;
        if matches!(code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

/// A mode's mapping table from keystrokes to actions. Registering the same
/// keystroke twice silently keeps the later action.
pub struct Keymap {
    mappings: HashMap<Keystroke, KeyAction>,
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    pub fn add(&mut self, keystroke: Keystroke, action: KeyAction) {
        self.mappings.insert(keystroke, action);
    }

    pub fn get(&self, keystroke: &Keystroke) -> Option<KeyAction> {
        self.mappings.get(keystroke).copied()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// The text a key produces when typed, or an empty string for keys with no
/// text form (function keys, arrows, control chords). Never fails; the
/// empty result makes the insertion a harmless no-op.
pub fn key_text(event: &KeyEvent) -> String {
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return String::new();
    }

    match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "\n".to_string(),
        KeyCode::Tab => "\t".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume(_editor: &mut Editor) -> Result<bool> {
        Ok(true)
    }

    fn ignore(_editor: &mut Editor) -> Result<bool> {
        Ok(false)
    }

    #[test]
    fn shifted_characters_normalize_to_the_same_keystroke() {
        let upper = Keystroke::from_event(&KeyEvent::new(
            KeyCode::Char('X'),
            KeyModifiers::SHIFT,
        ));
        assert_eq!(upper, Keystroke::plain(KeyCode::Char('X')));
        // Non-character keys keep their modifiers.
        let shift_tab = Keystroke::new(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_ne!(shift_tab, Keystroke::plain(KeyCode::Tab));
    }

    #[test]
    fn control_chords_stay_distinct_from_plain_keys() {
        let ctrl_c = Keystroke::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_ne!(ctrl_c, Keystroke::plain(KeyCode::Char('c')));
    }

    #[test]
    fn later_registration_wins() {
        let mut keymap = Keymap::new();
        let esc = Keystroke::plain(KeyCode::Esc);
        keymap.add(esc, ignore);
        keymap.add(esc, consume);
        assert_eq!(keymap.len(), 1);

        let mut editor = Editor::new();
        let action = keymap.get(&esc).expect("mapping registered");
        assert!(action(&mut editor).expect("action runs"));
    }

    #[test]
    fn lookup_misses_return_none() {
        let keymap = Keymap::new();
        assert!(keymap.get(&Keystroke::plain(KeyCode::Esc)).is_none());
    }

    #[test]
    fn printable_keys_render_their_text() {
        let event = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(key_text(&event), "x");
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_text(&enter), "\n");
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(key_text(&tab), "\t");
    }

    #[test]
    fn keys_without_a_text_form_render_empty() {
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(key_text(&f5), "");
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(key_text(&ctrl_w), "");
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(key_text(&left), "");
    }
}
