//! Single-line text input with cursor management, shared by every form
//! field and prompt in the combat view.

use std::str::FromStr;

use crossterm::event::KeyCode;

/// Which characters a buffer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Digits with an optional leading minus sign.
    Integer,
}

#[derive(Debug, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    kind: InputKind,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::with_kind(InputKind::Text)
    }

    pub fn numeric() -> Self {
        Self::with_kind(InputKind::Integer)
    }

    fn with_kind(kind: InputKind) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            kind,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            InputKind::Text => !c.is_control(),
            InputKind::Integer => c.is_ascii_digit() || (c == '-' && self.cursor == 0),
        }
    }

    /// Insert `c` at the cursor. Returns false when the buffer rejects it.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    /// Apply an editing key. Returns true when the key was an editing key.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                self.insert_char(c);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.len(),
            _ => return false,
        }
        true
    }

    /// Replace the content and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.content = text.chars().filter(|c| !c.is_control()).collect();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    /// Parse the trimmed content; `None` when empty or malformed.
    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.content.trim().parse().ok()
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> u16 {
        self.content[..self.cursor].chars().count() as u16
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
