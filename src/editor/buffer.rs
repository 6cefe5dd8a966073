use super::cursor::Cursor;
use anyhow::{Context, Result};
use std::fs;

/// The text being edited, stored as one `String` per line. The buffer always
/// holds at least one (possibly empty) line.
///
/// Mutations go through `insert` and `erase`, which both hand back the
/// position the cursor should move to. Callers must re-synchronize from the
/// returned position rather than assume their own stayed valid.
pub struct Buffer {
    pub lines: Vec<String>,
    pub file_path: Option<String>,
    pub is_modified: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            file_path: None,
            is_modified: false,
        }
    }

    /// Insert `text` at `at` and return the position just past the inserted
    /// text. Embedded newlines split the line. Inserting nothing is a no-op
    /// that still returns a valid (clamped) position.
    pub fn insert(&mut self, text: &str, at: Cursor) -> Cursor {
        let mut pos = self.clamp(at);
        if text.is_empty() {
            return pos;
        }

        for c in text.chars() {
            if c == '\n' {
                let rest = self.lines[pos.y].split_off(pos.x);
                self.lines.insert(pos.y + 1, rest);
                pos.y += 1;
                pos.x = 0;
            } else {
                self.lines[pos.y].insert(pos.x, c);
                pos.x += c.len_utf8();
            }
        }

        self.is_modified = true;
        pos
    }

    /// Remove the character just before `at` and return the removal point.
    /// At a line start this joins the line onto the previous one. At the
    /// buffer origin there is nothing to remove; the origin comes back
    /// unchanged.
    pub fn erase(&mut self, at: Cursor) -> Cursor {
        let mut pos = self.clamp(at);

        if pos.x > 0 {
            let line = &mut self.lines[pos.y];
            let start = line[..pos.x]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            line.remove(start);
            pos.x = start;
            self.is_modified = true;
        } else if pos.y > 0 {
            let tail = self.lines.remove(pos.y);
            pos.y -= 1;
            pos.x = self.lines[pos.y].len();
            self.lines[pos.y].push_str(&tail);
            self.is_modified = true;
        }

        pos
    }

    /// Clamp a position into the buffer: the line index into range, the byte
    /// offset to the nearest char boundary at or before the line end.
    pub fn clamp(&self, at: Cursor) -> Cursor {
        let y = at.y.min(self.lines.len() - 1);
        let line = &self.lines[y];
        let mut x = at.x.min(line.len());
        while x > 0 && !line.is_char_boundary(x) {
            x -= 1;
        }
        Cursor { x, y }
    }

    pub fn line(&self, y: usize) -> &str {
        self.lines.get(y).map(String::as_str).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, String::len)
    }

    /// The whole buffer as a single string, lines joined with '\n'.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn load_file(&mut self, path: &str) -> Result<()> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;

        self.lines = content.lines().map(str::to_string).collect();
        // A trailing newline means a final empty line; an empty file still
        // needs its one line.
        if content.is_empty() || content.ends_with('\n') {
            self.lines.push(String::new());
        }

        self.file_path = Some(path.to_string());
        self.is_modified = false;
        Ok(())
    }

    /// Write the buffer back to its file and return the path written.
    pub fn save(&mut self) -> Result<String> {
        let path = self
            .file_path
            .clone()
            .context("No file name")?;

        fs::write(&path, self.content())
            .with_context(|| format!("Failed to write file: {}", path))?;

        self.is_modified = false;
        Ok(path)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn buffer_with(lines: &[&str]) -> Buffer {
        let mut buffer = Buffer::new();
        buffer.lines = lines.iter().map(|l| l.to_string()).collect();
        buffer
    }

    #[test]
    fn insert_text_returns_end_position() {
        let mut buffer = buffer_with(&["ab"]);
        let pos = buffer.insert("X", Cursor::at(1, 0));
        assert_eq!(buffer.content(), "aXb");
        assert_eq!(pos, Cursor::at(2, 0));
        assert!(buffer.is_modified);
    }

    #[test]
    fn insert_empty_text_is_a_noop() {
        let mut buffer = buffer_with(&["ab"]);
        let pos = buffer.insert("", Cursor::at(1, 0));
        assert_eq!(buffer.content(), "ab");
        assert_eq!(pos, Cursor::at(1, 0));
        assert!(!buffer.is_modified);
    }

    #[test]
    fn insert_newline_splits_the_line() {
        let mut buffer = buffer_with(&["hello world"]);
        let pos = buffer.insert("\n", Cursor::at(5, 0));
        assert_eq!(buffer.lines, vec!["hello", " world"]);
        assert_eq!(pos, Cursor::at(0, 1));
    }

    #[test]
    fn insert_multiline_text() {
        let mut buffer = buffer_with(&["ad"]);
        let pos = buffer.insert("b\nc", Cursor::at(1, 0));
        assert_eq!(buffer.lines, vec!["ab", "cd"]);
        assert_eq!(pos, Cursor::at(1, 1));
    }

    #[test]
    fn insert_clamps_an_out_of_range_position() {
        let mut buffer = buffer_with(&["ab"]);
        let pos = buffer.insert("!", Cursor::at(99, 99));
        assert_eq!(buffer.content(), "ab!");
        assert_eq!(pos, Cursor::at(3, 0));
    }

    #[test]
    fn erase_removes_the_character_before() {
        let mut buffer = buffer_with(&["aXb"]);
        let pos = buffer.erase(Cursor::at(2, 0));
        assert_eq!(buffer.content(), "ab");
        assert_eq!(pos, Cursor::at(1, 0));
    }

    #[test]
    fn erase_at_line_start_joins_lines() {
        let mut buffer = buffer_with(&["ab", "cd"]);
        let pos = buffer.erase(Cursor::at(0, 1));
        assert_eq!(buffer.lines, vec!["abcd"]);
        assert_eq!(pos, Cursor::at(2, 0));
    }

    #[test]
    fn erase_at_origin_is_a_noop() {
        let mut buffer = buffer_with(&["ab"]);
        let pos = buffer.erase(Cursor::at(0, 0));
        assert_eq!(buffer.content(), "ab");
        assert_eq!(pos, Cursor::at(0, 0));
        assert!(!buffer.is_modified);
    }

    #[test]
    fn erase_handles_multibyte_characters() {
        let mut buffer = buffer_with(&["aé"]);
        let pos = buffer.erase(Cursor::at(3, 0));
        assert_eq!(buffer.content(), "a");
        assert_eq!(pos, Cursor::at(1, 0));
    }

    #[test]
    fn clamp_lands_on_char_boundaries() {
        let buffer = buffer_with(&["aé"]);
        // Byte 2 is inside the two-byte 'é'.
        assert_eq!(buffer.clamp(Cursor::at(2, 0)), Cursor::at(1, 0));
        assert_eq!(buffer.clamp(Cursor::at(7, 3)), Cursor::at(3, 0));
    }

    #[test]
    fn load_and_save_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(file, "one\ntwo\n").expect("write temp file");
        let path = file.path().to_string_lossy().to_string();

        let mut buffer = Buffer::new();
        buffer.load_file(&path).expect("load file");
        assert_eq!(buffer.lines, vec!["one", "two", ""]);
        assert!(!buffer.is_modified);

        buffer.insert("three\n", Cursor::at(0, 2));
        assert!(buffer.is_modified);
        let saved = buffer.save().expect("save file");
        assert_eq!(saved, path);
        assert!(!buffer.is_modified);

        let on_disk = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(on_disk, "one\ntwo\nthree\n");
    }

    #[test]
    fn save_without_a_path_fails() {
        let mut buffer = buffer_with(&["x"]);
        assert!(buffer.save().is_err());
    }
}
