use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line editor for the chat input box.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap();
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let byte_offset = self.char_to_byte(self.cursor - 1);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    let byte_offset = self.char_to_byte(self.cursor);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text
                        .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                }
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.text.chars().count();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_word_back();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut input = LineInput::new("ac");
        input.handle(key(KeyCode::Char('d')));
        assert_eq!(input.value(), "acd");

        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('z')));
        assert_eq!(input.value(), "zacd");
        assert_eq!(input.cursor, 1);

        input.handle(key(KeyCode::Right));
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "zabcd");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn multibyte_hangul_editing() {
        let mut input = LineInput::new("명사");
        input.handle(key(KeyCode::Char('란')));
        assert_eq!(input.value(), "명사란");

        input.handle(key(KeyCode::Backspace));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "명");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn backspace_at_boundaries() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn delete_at_boundaries() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "b");

        input.handle(key(KeyCode::End));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn ctrl_w_word_delete() {
        let mut input = LineInput::new("foo bar  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "foo ");
    }

    #[test]
    fn ctrl_a_e_u() {
        let mut input = LineInput::new("test");
        input.handle(ctrl('a'));
        assert_eq!(input.cursor, 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor, 4);
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn render_parts_positions() {
        let mut input = LineInput::new("abc");
        input.cursor = 1;
        let (before, ch, after) = input.render_parts();
        assert_eq!((before, ch, after), ("a", Some('b'), "c"));

        input.cursor = 3;
        let (before, ch, after) = input.render_parts();
        assert_eq!((before, ch, after), ("abc", None, ""));
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("test");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }
}
