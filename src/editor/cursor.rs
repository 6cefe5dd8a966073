use super::Buffer;

/// A position in the buffer: `y` is the line index, `x` is a byte offset
/// into that line. `x` always sits on a `char` boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn at(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Step one character left, stopping at the start of the line.
    pub fn move_left(&mut self, buffer: &Buffer) {
        let line = buffer.line(self.y);
        if self.x > 0 {
            self.x = line[..self.x]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    /// Step one character right, stopping at the end of the line.
    pub fn move_right(&mut self, buffer: &Buffer) {
        let line = buffer.line(self.y);
        if self.x < line.len() {
            self.x += line[self.x..].chars().next().map_or(0, |c| c.len_utf8());
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.x = 0;
    }

    pub fn move_to_line_end(&mut self, buffer: &Buffer) {
        self.x = buffer.line_len(self.y);
    }

    pub fn move_to_buffer_start(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    pub fn move_to_buffer_end(&mut self, buffer: &Buffer) {
        self.y = buffer.line_count().saturating_sub(1);
        self.x = buffer.line_len(self.y);
    }

    /// Display column (character count before `x`), for the status line and
    /// viewport math.
    pub fn column(&self, buffer: &Buffer) -> usize {
        buffer.line(self.y)[..self.x].chars().count()
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Buffer;

    fn buffer_with(lines: &[&str]) -> Buffer {
        let mut buffer = Buffer::new();
        buffer.lines = lines.iter().map(|l| l.to_string()).collect();
        buffer
    }

    #[test]
    fn left_stops_at_line_start() {
        let buffer = buffer_with(&["abc"]);
        let mut cursor = Cursor::at(1, 0);
        cursor.move_left(&buffer);
        assert_eq!(cursor, Cursor::at(0, 0));
        cursor.move_left(&buffer);
        assert_eq!(cursor, Cursor::at(0, 0));
    }

    #[test]
    fn right_stops_at_line_end() {
        let buffer = buffer_with(&["ab"]);
        let mut cursor = Cursor::new();
        cursor.move_right(&buffer);
        cursor.move_right(&buffer);
        assert_eq!(cursor.x, 2);
        cursor.move_right(&buffer);
        assert_eq!(cursor.x, 2);
    }

    #[test]
    fn steps_whole_characters() {
        // "é" is two bytes; horizontal motion must not land inside it.
        let buffer = buffer_with(&["aéb"]);
        let mut cursor = Cursor::new();
        cursor.move_right(&buffer);
        assert_eq!(cursor.x, 1);
        cursor.move_right(&buffer);
        assert_eq!(cursor.x, 3);
        cursor.move_left(&buffer);
        assert_eq!(cursor.x, 1);
    }

    #[test]
    fn line_and_buffer_jumps() {
        let buffer = buffer_with(&["first", "second line", "end"]);
        let mut cursor = Cursor::at(2, 1);

        cursor.move_to_line_end(&buffer);
        assert_eq!(cursor, Cursor::at(11, 1));

        cursor.move_to_line_start();
        assert_eq!(cursor, Cursor::at(0, 1));

        cursor.move_to_buffer_end(&buffer);
        assert_eq!(cursor, Cursor::at(3, 2));

        cursor.move_to_buffer_start();
        assert_eq!(cursor, Cursor::at(0, 0));
    }

    #[test]
    fn display_column_counts_characters() {
        let buffer = buffer_with(&["aéb"]);
        let cursor = Cursor::at(3, 0);
        assert_eq!(cursor.column(&buffer), 2);
    }
}
