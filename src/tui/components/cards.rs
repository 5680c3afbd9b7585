use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// A single headline number with an optional caption underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub caption: Option<String>,
    pub color: Color,
}

impl MetricCard {
    pub fn new(title: &str, value: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            caption: None,
            color,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let mut lines = vec![Line::from(Span::styled(
            self.value.as_str(),
            Style::default()
                .fg(self.color)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(caption) = &self.caption {
            lines.push(Line::from(Span::styled(
                caption.as_str(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(Style::default().fg(Color::Gray));

        let paragraph = Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }
}
