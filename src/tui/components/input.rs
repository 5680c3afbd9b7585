use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const MASK: char = '•';

#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    /// Cursor position in chars, not bytes.
    pub cursor: usize,
    pub placeholder: String,
    pub label: String,
    pub focused: bool,
    pub masked: bool,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            focused: false,
            masked: false,
        }
    }

    /// Renders the value as bullets, for secrets.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index(self.cursor);
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.len_chars() {
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.len_chars() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.len_chars();
                true
            }
            _ => false,
        }
    }

    fn display_value(&self) -> String {
        if self.masked {
            MASK.to_string().repeat(self.len_chars())
        } else {
            self.value.clone()
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.label.as_str())
            .border_style(if self.focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            });

        let shown = self.display_value();
        let text = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
        } else if self.focused {
            let split = shown
                .char_indices()
                .nth(self.cursor)
                .map_or(shown.len(), |(i, _)| i);
            let (before, after) = shown.split_at(split);
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled("│", Style::default().fg(Color::Yellow)),
                Span::raw(after.to_string()),
            ])
        } else {
            Line::from(Span::raw(shown))
        };

        let paragraph = Paragraph::new(text).block(block);
        f.render_widget(paragraph, area);
    }

    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut InputField, code: KeyCode) {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn edits_multibyte_text_by_char() {
        let mut field = InputField::new("Channel", "@handle").with_value("@café");
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.value, "@caf");

        press(&mut field, KeyCode::Home);
        press(&mut field, KeyCode::Delete);
        press(&mut field, KeyCode::Char('é'));
        assert_eq!(field.value, "écaf");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut field = InputField::new("Channel", "");
        let handled =
            field.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
        assert!(!handled);
        assert!(field.value.is_empty());
    }

    #[test]
    fn masked_display_hides_secret() {
        let field = InputField::new("Key", "AIzaSy...").masked().with_value("secret");
        assert_eq!(field.display_value(), "••••••");
        assert!(field.is_valid());
    }
}
