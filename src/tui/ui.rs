use crate::core::{ChannelSnapshot, aggregate, format_compact, format_count};
use crate::tui::app::{App, Focus};
use crate::tui::components::{MetricCard, VideoChart};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search
            Constraint::Length(3), // Status banner
            Constraint::Min(1),    // Dashboard body
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_title(f, chunks[0]);
    app.search_input.render(f, chunks[1]);
    draw_banner(f, app, chunks[2]);

    match app.state.snapshot.clone() {
        Some(snapshot) => draw_dashboard(f, app, &snapshot, chunks[3]),
        None => draw_empty(f, app, chunks[3]),
    }

    draw_help(f, app, chunks[4]);

    if app.state.show_settings {
        draw_settings(f, app);
    }
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("TubeLens · YouTube Channel Analytics")
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_banner(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.state;
    let (line, border) = if let Some(error) = &state.error {
        (
            Line::from(vec![
                Span::styled(
                    "Error: ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.clone(), Style::default().fg(Color::LightRed)),
            ]),
            Color::Red,
        )
    } else if !state.has_api_key() {
        (
            Line::from(Span::styled(
                "A YouTube Data API v3 key is needed to fetch data. Press Ctrl+K to add it.",
                Style::default().fg(Color::Yellow),
            )),
            Color::Yellow,
        )
    } else {
        let busy = state.is_fetching() || state.is_analyzing();
        (app.activity.status_line(busy), Color::Gray)
    };

    let banner = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(banner, area);
}

fn draw_empty(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Unlock your channel's potential",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Enter a channel handle (@name), id (UC...) or URL and press Enter.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Metrics and recent uploads load first; Ctrl+G asks Gemini for a strategy report.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(intro, chunks[0]);

    app.activity.render(f, chunks[1]);
}

fn draw_dashboard(f: &mut Frame, app: &mut App, snapshot: &ChannelSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Channel header
            Constraint::Length(4), // Metric cards
            Constraint::Fill(1),   // Chart + videos
            Constraint::Fill(1),   // Report
        ])
        .split(area);

    draw_channel_header(f, snapshot, chunks[0]);
    draw_cards(f, snapshot, chunks[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    VideoChart::new(&snapshot.videos).render(f, middle[0]);
    app.video_list.render(f, middle[1], app.focus == Focus::Videos);

    draw_report_panel(f, app, chunks[3]);
}

fn draw_channel_header(f: &mut Frame, snapshot: &ChannelSnapshot, area: Rect) {
    let snippet = &snapshot.channel.snippet;
    let mut spans = vec![Span::styled(
        snippet.title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(custom_url) = &snippet.custom_url {
        spans.push(Span::styled(
            format!("  {custom_url}"),
            Style::default().fg(Color::LightBlue),
        ));
    }
    if let Some(country) = &snippet.country {
        spans.push(Span::styled(
            format!("  {country}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_cards(f: &mut Frame, snapshot: &ChannelSnapshot, area: Rect) {
    let stats = &snapshot.channel.statistics;
    let metrics = aggregate(&snapshot.videos);

    let subscribers = if stats.hidden_subscriber_count {
        "hidden".to_string()
    } else {
        format_count(stats.subscriber_count.as_deref())
    };

    let cards = [
        MetricCard::new("Total Subscribers", subscribers, Color::LightBlue),
        MetricCard::new(
            "Total Views",
            format_count(stats.view_count.as_deref()),
            Color::Green,
        ),
        MetricCard::new(
            "Video Count",
            format_count(stats.video_count.as_deref()),
            Color::Yellow,
        ),
        MetricCard::new(
            "Engagement Rate",
            format!("{}%", metrics.engagement_rate_percent),
            Color::Magenta,
        )
        .with_caption(format!(
            "Avg views: {}",
            format_compact(metrics.average_views)
        )),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        card.render(f, *column);
    }
}

fn draw_report_panel(f: &mut Frame, app: &mut App, area: Rect) {
    app.viewer_height = area.height;

    if !app.report_viewer.is_empty() {
        app.report_viewer.render(f, area, app.focus == Focus::Report);
        return;
    }

    let state = &app.state;
    let lines = if state.is_analyzing() {
        vec![Line::from(Span::styled(
            format!("{} Analyzing performance data...", app.activity.spinner()),
            Style::default().fg(Color::Yellow),
        ))]
    } else if state.can_generate_report() {
        vec![
            Line::from(Span::styled(
                "Get AI-powered insights",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Press Ctrl+G to have {} analyze recent performance and suggest next steps.",
                app.model()
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            "No uploads to analyze for this channel.",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let prompt = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("AI Strategy Report"),
        );
    f.render_widget(prompt, area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.state.show_settings {
        "[Enter] Save  [Esc] Cancel"
    } else {
        match app.focus {
            Focus::Search => "[Enter] Fetch  [Tab] Focus  [Ctrl+G] Report  [Ctrl+K] API Key  [Esc] Exit",
            Focus::Videos => "[↑↓] Navigate  [Tab] Focus  [Ctrl+G] Report  [Ctrl+K] API Key  [q] Exit",
            Focus::Report => "[↑↓] Scroll  [PgUp/PgDn] Page  [Tab] Focus  [Ctrl+G] Regenerate  [q] Exit",
        }
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_settings(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 11, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("API Configuration")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Length(3)])
        .split(inner);

    let explanation = Paragraph::new(vec![
        Line::from("To fetch real data you need a YouTube Data API v3 key."),
        Line::from(Span::styled(
            "The key is kept in memory only and never written to disk.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(explanation, chunks[0]);

    app.key_input.render(f, chunks[1]);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Shortens `text` to at most `max_width` terminal columns, ending in `…`
/// when anything was cut.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
