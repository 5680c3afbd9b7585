use crate::core::StrategyReport;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const DEFAULT_WIDTH: usize = 80;

/// Scrollable panel for the current strategy report.
///
/// Text is wrapped here rather than by the `Paragraph`, so one `Line` is
/// one screen row and the scroll limit is exact.
pub struct ReportViewer {
    report: Option<StrategyReport>,
    lines: Vec<Line<'static>>,
    width: usize,
    pub scroll: usize,
    pub title: String,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self {
            report: None,
            lines: Vec::new(),
            width: DEFAULT_WIDTH,
            scroll: 0,
            title: "AI Strategy Report".to_string(),
        }
    }

    /// Replaces the content wholesale and scrolls back to the top.
    pub fn set_report(&mut self, report: &StrategyReport, model: &str) {
        self.lines = report_lines(report, self.width);
        self.report = Some(report.clone());
        self.title = format!(
            "AI Strategy Report (generated at {} using {model})",
            report.generated_at
        );
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.report = None;
        self.lines.clear();
        self.scroll = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.report.is_none()
    }

    /// Re-wraps for a new inner width.
    fn set_width(&mut self, width: usize) {
        let width = width.max(1);
        if width == self.width {
            return;
        }
        self.width = width;
        if let Some(report) = &self.report {
            self.lines = report_lines(report, width);
        }
    }

    fn max_scroll(&self, area_height: usize) -> usize {
        self.lines.len().saturating_sub(area_height.saturating_sub(2))
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: usize) -> bool {
        let page_size = area_height.saturating_sub(2).max(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.scroll < self.max_scroll(area_height) {
                    self.scroll += 1;
                }
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(page_size);
                true
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + page_size).min(self.max_scroll(area_height));
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                self.scroll = self.max_scroll(area_height);
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, area_height: usize) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            MouseEventKind::ScrollDown => {
                if self.scroll < self.max_scroll(area_height) {
                    self.scroll += 1;
                }
                true
            }
            _ => false,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        self.set_width(area.width.saturating_sub(2) as usize);
        self.scroll = self.scroll.min(self.max_scroll(area.height as usize));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Indexed(63))
            });

        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0));

        f.render_widget(paragraph, area);
    }
}

impl Default for ReportViewer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading(text: &'static str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// Wraps `text` to `width`, putting a styled `marker` on the first row and
/// aligning continuation rows under the text.
fn marked_rows(marker: String, style: Style, text: &str, width: usize) -> Vec<Line<'static>> {
    let indent = " ".repeat(marker.chars().count());
    let text_width = width.saturating_sub(indent.len()).max(1);

    textwrap::wrap(text, text_width)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let prefix = if i == 0 {
                Span::styled(marker.clone(), style)
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![prefix, Span::raw(row.into_owned())])
        })
        .collect()
}

fn report_lines(report: &StrategyReport, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Executive Summary", Color::LightBlue)];
    lines.extend(
        textwrap::wrap(&report.executive_summary, width.max(1))
            .into_iter()
            .map(|row| Line::from(row.into_owned())),
    );
    lines.push(Line::default());
    lines.push(heading("Key Performance Insights", Color::Green));

    for insight in &report.key_insights {
        lines.extend(marked_rows(
            "✓ ".to_string(),
            Style::default().fg(Color::Green),
            insight,
            width,
        ));
    }

    lines.push(Line::default());
    lines.push(heading("Strategic Suggestions", Color::Yellow));

    for (i, suggestion) in report.improvement_suggestions.iter().enumerate() {
        lines.extend(marked_rows(
            format!("{}. ", i + 1),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            suggestion,
            width,
        ));
    }

    lines
}
