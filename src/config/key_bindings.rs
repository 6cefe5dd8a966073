use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::editor::Keystroke;

/// One configured key chord: a key name plus optional modifier names.
/// Key names are single characters or the lowercase special-key names
/// ("esc", "enter", "tab", ..., "f1".."f12").
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KeyBinding {
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl KeyBinding {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(modifier.to_string());
        self
    }

    /// The exact-match lookup key this binding describes, or `None` when
    /// the key or a modifier name is not recognized.
    pub fn keystroke(&self) -> Option<Keystroke> {
        let code = parse_key_name(&self.key)?;

        let mut modifiers = KeyModifiers::NONE;
        for name in &self.modifiers {
            match name.as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        Some(Keystroke::new(code, modifiers))
    }
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let code = match name {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let n: u8 = name.strip_prefix('f')?.parse().ok()?;
            if (1..=12).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

/// Per-mode tables from command name to key chord. The editor resolves the
/// command names to actions when a mode is constructed; a command bound
/// twice keeps one entry (the map key is the command), while two commands
/// bound to the same chord resolve last-write-wins in the mapping table.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default)]
    pub normal_mode: HashMap<String, KeyBinding>,
    #[serde(default)]
    pub insert_mode: HashMap<String, KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut normal_mode = HashMap::new();
        normal_mode.insert("quit".to_string(), KeyBinding::new("q"));
        normal_mode.insert("save_file".to_string(), KeyBinding::new("w"));
        normal_mode.insert("insert_mode".to_string(), KeyBinding::new("i"));
        normal_mode.insert("insert_mode_after".to_string(), KeyBinding::new("a"));
        normal_mode.insert("delete_char".to_string(), KeyBinding::new("x"));
        normal_mode.insert("move_left".to_string(), KeyBinding::new("h"));
        normal_mode.insert("move_down".to_string(), KeyBinding::new("j"));
        normal_mode.insert("move_up".to_string(), KeyBinding::new("k"));
        normal_mode.insert("move_right".to_string(), KeyBinding::new("l"));
        normal_mode.insert("move_to_line_start".to_string(), KeyBinding::new("^"));
        normal_mode.insert("move_to_line_end".to_string(), KeyBinding::new("$"));
        normal_mode.insert("move_to_file_start".to_string(), KeyBinding::new("g"));
        normal_mode.insert("move_to_file_end".to_string(), KeyBinding::new("G"));

        let mut insert_mode = HashMap::new();
        insert_mode.insert("normal_mode".to_string(), KeyBinding::new("esc"));

        Self {
            normal_mode,
            insert_mode,
        }
    }
}
