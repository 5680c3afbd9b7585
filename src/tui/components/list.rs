use crate::core::{VideoRecord, format_compact};
use crate::tui::ui::truncate;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Recent uploads, most recent first.
pub struct VideoList {
    pub items: Vec<VideoRecord>,
    pub state: ListState,
    viewport_size: usize,
}

impl VideoList {
    pub fn new(items: Vec<VideoRecord>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            viewport_size: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                true
            }
            KeyCode::PageDown => {
                self.page_down();
                true
            }
            KeyCode::PageUp => {
                self.page_up();
                true
            }
            KeyCode::Home => {
                self.select(0);
                true
            }
            KeyCode::End => {
                self.select(self.items.len().saturating_sub(1));
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let current = self.state.selected().unwrap_or(0);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.select(current.saturating_sub(1));
                true
            }
            MouseEventKind::ScrollDown => {
                self.select(current + 1);
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    fn page_down(&mut self) {
        let step = self.viewport_size.max(1);
        let current = self.state.selected().unwrap_or(0);
        self.select(current + step);
    }

    fn page_up(&mut self) {
        let step = self.viewport_size.max(1);
        let current = self.state.selected().unwrap_or(0);
        self.select(current.saturating_sub(step));
    }

    /// Selects `index`, clamped to the last item.
    fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            self.state.select(None);
            return;
        }
        self.state.select(Some(index.min(self.items.len() - 1)));
        self.adjust_offset();
    }

    pub fn get_selected(&self) -> Option<&VideoRecord> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        self.viewport_size = (area.height.saturating_sub(2) as usize).max(1);
        self.adjust_offset();

        let title_width = (area.width as usize).saturating_sub(24).max(8);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, video)| {
                let line = Line::from(vec![
                    Span::styled(format!("{:>2} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        truncate(&video.snippet.title, title_width),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!(" {:>6}", format_compact(video.views())),
                        Style::default().fg(Color::LightBlue),
                    ),
                    Span::styled(
                        format!(" {:>6}", format_compact(video.likes())),
                        Style::default().fg(Color::Green),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let title = if self.items.is_empty() {
            "Recent Videos (none)".to_string()
        } else {
            format!("Recent Videos ({})  views / likes", self.items.len())
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(if focused {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Gray)
                    }),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.state);
    }

    pub fn update_items(&mut self, new_items: Vec<VideoRecord>) {
        self.items = new_items;
        *self.state.offset_mut() = 0;
        if self.items.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
        self.adjust_offset();
    }

    fn adjust_offset(&mut self) {
        if self.items.is_empty() {
            *self.state.offset_mut() = 0;
            return;
        }

        let viewport = self.viewport_size.max(1);
        let selected = self.state.selected().unwrap_or(0).min(self.items.len() - 1);

        let max_offset = self.items.len().saturating_sub(viewport);
        let mut offset = self.state.offset().min(max_offset);

        if selected < offset {
            offset = selected;
        } else if selected >= offset + viewport {
            offset = selected + 1 - viewport;
        }
        *self.state.offset_mut() = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn videos(n: usize) -> Vec<VideoRecord> {
        (0..n)
            .map(|i| VideoRecord {
                id: format!("v{i}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn wraps_around_with_arrows() {
        let mut list = VideoList::new(videos(3));
        list.previous();
        assert_eq!(list.get_selected().map(|v| v.id.as_str()), Some("v2"));
        list.next();
        assert_eq!(list.get_selected().map(|v| v.id.as_str()), Some("v0"));
    }

    #[test]
    fn end_and_page_down_clamp() {
        let mut list = VideoList::new(videos(4));
        list.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        list.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        list.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        list.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        assert_eq!(list.state.selected(), Some(3));

        list.handle_key(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE));
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn replacing_items_resets_selection() {
        let mut list = VideoList::new(videos(5));
        list.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        list.update_items(videos(2));
        assert_eq!(list.state.selected(), Some(0));

        list.update_items(Vec::new());
        assert_eq!(list.get_selected(), None);
    }
}
