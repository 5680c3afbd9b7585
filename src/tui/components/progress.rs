use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Status line with a spinner and a short, timestamped activity log.
pub struct ActivityLog {
    pub message: String,
    pub logs: Vec<String>,
    pub max_logs: usize,
    frame: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            logs: Vec::new(),
            max_logs: 10,
            frame: 0,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn add_log(&mut self, log: impl AsRef<str>) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push(format!("[{timestamp}] {}", log.as_ref()));

        if self.logs.len() > self.max_logs {
            self.logs.remove(0);
        }
    }

    /// Advances the spinner one frame.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER.len();
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.frame]
    }

    /// One-line status, spinning while `busy`.
    pub fn status_line(&self, busy: bool) -> Line<'static> {
        if busy {
            Line::from(vec![
                Span::styled(
                    format!("{} ", self.spinner()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(self.message.clone(), Style::default().fg(Color::Yellow)),
            ])
        } else {
            Line::from(Span::styled(
                self.message.clone(),
                Style::default().fg(Color::Gray),
            ))
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.logs.len().saturating_sub(visible);
        let log_lines: Vec<Line> = self
            .logs
            .iter()
            .skip(skip)
            .map(|log| Line::from(Span::raw(log.as_str())))
            .collect();

        let paragraph = Paragraph::new(log_lines)
            .block(Block::default().borders(Borders::ALL).title("Activity"));
        f.render_widget(paragraph, area);
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
