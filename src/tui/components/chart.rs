use crate::core::{VideoRecord, format_compact};
use crate::tui::ui::truncate;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub views: u64,
    pub likes: u64,
}

/// Views and likes per video, oldest on the left.
pub struct VideoChart {
    points: Vec<ChartPoint>,
}

impl VideoChart {
    pub fn new(videos: &[VideoRecord]) -> Self {
        Self {
            points: chart_points(videos),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Recent Performance  (views / likes)");

        if self.points.is_empty() {
            let empty = Paragraph::new("No videos to chart.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let inner_width = area.width.saturating_sub(2) as usize;
        let groups = self.points.len().max(1);
        // two bars plus one gap per group
        let bar_width = ((inner_width / groups).saturating_sub(2) / 2).clamp(1, 8) as u16;

        let mut chart = BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(0)
            .group_gap(1);

        for point in &self.points {
            let bars = [
                Bar::default()
                    .value(point.views)
                    .text_value(format_compact(point.views))
                    .style(Style::default().fg(Color::LightBlue)),
                Bar::default()
                    .value(point.likes)
                    .text_value(format_compact(point.likes))
                    .style(Style::default().fg(Color::Green)),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(point.label.clone()))
                    .bars(&bars),
            );
        }

        f.render_widget(chart, area);
    }
}

/// Reverses the most-recent-first playlist order for a left-to-right timeline.
pub fn chart_points(videos: &[VideoRecord]) -> Vec<ChartPoint> {
    videos
        .iter()
        .rev()
        .map(|video| ChartPoint {
            label: truncate(&video.snippet.title, LABEL_WIDTH),
            views: video.views(),
            likes: video.likes(),
        })
        .collect()
}
