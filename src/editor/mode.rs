use anyhow::Result;
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, warn};

use super::cursor::Cursor;
use super::keymap::{key_text, KeyAction, Keymap, Keystroke};
use super::{Editor, StyleToken};
use crate::config::KeyBindings;

/// How the terminal cursor is drawn. The active style is the top of the
/// editor's style stack; Insert mode pushes `Bar` on entry and pops it on
/// exit, restoring whatever was underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Block,
    Bar,
}

impl CursorStyle {
    pub fn terminal_style(self) -> SetCursorStyle {
        match self {
            CursorStyle::Block => SetCursorStyle::SteadyBlock,
            CursorStyle::Bar => SetCursorStyle::SteadyBar,
        }
    }
}

/// The active editing mode. Each variant owns its mapping table and any
/// mode-local state; the set is closed so dispatch can match exhaustively.
/// A mode value lives exactly as long as the mode is active: switching
/// modes replaces the whole value, so NormalMode always starts fresh.
pub enum Mode {
    Normal(NormalMode),
    Insert(InsertMode),
}

impl Mode {
    pub fn normal(bindings: &KeyBindings) -> Self {
        Mode::Normal(NormalMode::new(bindings))
    }

    /// Display name for the status line.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal(_) => "Normal",
            Mode::Insert(_) => "Insert",
        }
    }

    /// Exact-match lookup in the active mode's mapping table.
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<KeyAction> {
        match self {
            Mode::Normal(normal) => normal.keymap.get(keystroke),
            Mode::Insert(insert) => insert.keymap.get(keystroke),
        }
    }
}

pub struct NormalMode {
    keymap: Keymap,
    /// Widest column visited by vertical motion; lets the cursor re-expand
    /// onto longer lines after crossing a short one.
    virtual_column: usize,
}

impl NormalMode {
    pub fn new(bindings: &KeyBindings) -> Self {
        Self {
            keymap: build_keymap(&bindings.normal_mode, normal_action),
            virtual_column: 0,
        }
    }
}

pub struct InsertMode {
    keymap: Keymap,
    /// Token for the cursor style pushed on entry; leaving the mode releases
    /// it, which keeps the style stack balanced.
    style: StyleToken,
}

impl InsertMode {
    pub fn new(bindings: &KeyBindings, style: StyleToken) -> Self {
        Self {
            keymap: build_keymap(&bindings.insert_mode, insert_action),
            style,
        }
    }

    pub fn style_token(&self) -> StyleToken {
        self.style
    }
}

/// Resolve a command-name table from the config into a mapping table.
/// Entries that name an unknown command or an unparseable chord are skipped
/// with a warning rather than failing the whole table.
fn build_keymap(
    bindings: &std::collections::HashMap<String, crate::config::KeyBinding>,
    resolve: fn(&str) -> Option<KeyAction>,
) -> Keymap {
    let mut keymap = Keymap::new();
    for (command, binding) in bindings {
        let keystroke = match binding.keystroke() {
            Some(keystroke) => keystroke,
            None => {
                warn!("Ignoring unparseable key binding {:?} for '{}'", binding.key, command);
                continue;
            }
        };
        match resolve(command) {
            Some(action) => keymap.add(keystroke, action),
            None => warn!("Ignoring unknown command '{}' in key bindings", command),
        }
    }
    keymap
}

fn normal_action(command: &str) -> Option<KeyAction> {
    let action: KeyAction = match command {
        "move_left" => move_left,
        "move_down" => move_down,
        "move_up" => move_up,
        "move_right" => move_right,
        "move_to_line_start" => move_to_line_start,
        "move_to_line_end" => move_to_line_end,
        "move_to_file_start" => move_to_file_start,
        "move_to_file_end" => move_to_file_end,
        "insert_mode" => enter_insert,
        "insert_mode_after" => enter_insert_after,
        "delete_char" => delete_char,
        "save_file" => save_file,
        "quit" => quit,
        _ => return None,
    };
    Some(action)
}

fn insert_action(command: &str) -> Option<KeyAction> {
    let action: KeyAction = match command {
        "normal_mode" => leave_insert,
        _ => return None,
    };
    Some(action)
}

/// Fallback for keys with no Normal-mode mapping: not an error, just
/// unhandled. The dispatch loop may route the key elsewhere.
pub(crate) fn on_unmapped_normal(_editor: &mut Editor, key: &KeyEvent) -> Result<bool> {
    debug!("Unhandled key in Normal mode: {:?}", key.code);
    Ok(false)
}

/// Fallback for Insert mode: every key is consumed. Backspace erases before
/// the cursor; anything else inserts its text form, which for keys without
/// one is empty and leaves the buffer untouched. The cursor always resyncs
/// to the position the buffer hands back.
pub(crate) fn on_unmapped_insert(editor: &mut Editor, key: &KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Backspace {
        editor.cursor = editor.buffer.erase(editor.cursor);
    } else {
        let text = key_text(key);
        editor.cursor = editor.buffer.insert(&text, editor.cursor);
    }
    editor.sync_viewport();
    Ok(true)
}

// Normal-mode actions. Motion clamps at the buffer edges; running into an
// edge consumes the key without moving.

fn move_left(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_left(&editor.buffer);
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn move_right(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_right(&editor.buffer);
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn move_down(editor: &mut Editor) -> Result<bool> {
    if editor.cursor.y + 1 < editor.buffer.line_count() {
        move_vertically(editor, editor.cursor.y + 1);
    }
    Ok(true)
}

fn move_up(editor: &mut Editor) -> Result<bool> {
    if editor.cursor.y > 0 {
        move_vertically(editor, editor.cursor.y - 1);
    }
    Ok(true)
}

/// Vertical motion keeps the widest column visited so the cursor slides
/// over short lines and comes back out on long ones.
fn move_vertically(editor: &mut Editor, target_row: usize) {
    let remembered = match &editor.mode {
        Mode::Normal(normal) => normal.virtual_column,
        Mode::Insert(_) => editor.cursor.x,
    };
    let target_column = editor.cursor.x.max(remembered);

    editor.cursor = editor.buffer.clamp(Cursor::at(target_column, target_row));
    if let Mode::Normal(normal) = &mut editor.mode {
        normal.virtual_column = target_column;
    }
    editor.sync_viewport();
}

/// Horizontal motion resets the remembered column to wherever it landed.
fn remember_column(editor: &mut Editor) {
    let column = editor.cursor.x;
    if let Mode::Normal(normal) = &mut editor.mode {
        normal.virtual_column = column;
    }
}

fn move_to_line_start(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_to_line_start();
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn move_to_line_end(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_to_line_end(&editor.buffer);
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn move_to_file_start(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_to_buffer_start();
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn move_to_file_end(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_to_buffer_end(&editor.buffer);
    remember_column(editor);
    editor.sync_viewport();
    Ok(true)
}

fn enter_insert(editor: &mut Editor) -> Result<bool> {
    editor.enter_insert_mode();
    Ok(true)
}

/// Enter Insert mode just past the cursor (vi's `a`).
fn enter_insert_after(editor: &mut Editor) -> Result<bool> {
    editor.cursor.move_right(&editor.buffer);
    editor.enter_insert_mode();
    Ok(true)
}

/// Delete the character under the cursor (vi's `x`), composed from the
/// buffer's erase-before-position primitive. Stays within the line.
fn delete_char(editor: &mut Editor) -> Result<bool> {
    let mut after = editor.cursor;
    after.move_right(&editor.buffer);
    if after != editor.cursor {
        editor.cursor = editor.buffer.erase(after);
        editor.sync_viewport();
    }
    Ok(true)
}

fn save_file(editor: &mut Editor) -> Result<bool> {
    match editor.buffer.save() {
        Ok(path) => editor.status_message = format!("\"{}\" written", path),
        Err(err) => editor.status_message = format!("Save failed: {}", err),
    }
    Ok(true)
}

fn quit(editor: &mut Editor) -> Result<bool> {
    editor.should_quit = true;
    Ok(true)
}

/// The one mapped key in Insert mode: pop the style pushed on entry and
/// hand control back to a fresh Normal mode. Escape is always consumed.
fn leave_insert(editor: &mut Editor) -> Result<bool> {
    editor.leave_insert_mode()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeyBinding, KeyBindings};

    #[test]
    fn default_bindings_resolve_to_actions() {
        let bindings = KeyBindings::default();
        let normal = NormalMode::new(&bindings);
        assert_eq!(normal.keymap.len(), bindings.normal_mode.len());

        let insert = InsertMode::new(&bindings, StyleToken::floor());
        assert_eq!(insert.keymap.len(), bindings.insert_mode.len());
        assert!(insert
            .keymap
            .get(&Keystroke::plain(KeyCode::Esc))
            .is_some());
    }

    #[test]
    fn unknown_commands_are_skipped() {
        let mut bindings = KeyBindings::default();
        bindings
            .normal_mode
            .insert("summon_dragon".to_string(), KeyBinding::new("z"));
        let normal = NormalMode::new(&bindings);
        assert_eq!(normal.keymap.len(), bindings.normal_mode.len() - 1);
    }

    #[test]
    fn unparseable_chords_are_skipped() {
        let mut bindings = KeyBindings::default();
        bindings
            .normal_mode
            .insert("quit".to_string(), KeyBinding::new("not-a-key"));
        let normal = NormalMode::new(&bindings);
        assert_eq!(normal.keymap.len(), bindings.normal_mode.len() - 1);
    }

    #[test]
    fn mode_names() {
        let bindings = KeyBindings::default();
        assert_eq!(Mode::normal(&bindings).name(), "Normal");
        let insert = Mode::Insert(InsertMode::new(&bindings, StyleToken::floor()));
        assert_eq!(insert.name(), "Insert");
    }
}
