mod cli;
mod config;
mod core;
mod error;
mod logging;
mod tui;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::core::{
    ChannelRecord, ChannelSnapshot, DashboardService, StrategyReport, VideoRecord, aggregate,
    format_compact, format_count,
};
use crate::error::{Error, Result};
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use tracing::error;

const WRAP_WIDTH: usize = 88;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let settings = Settings::from_env()
        .with_youtube_api_key(cli.api_key)
        .with_model(cli.model);

    let result = match cli.command {
        Some(Commands::Channel { input }) => run_cli_channel(&settings, &input).await,
        Some(Commands::Videos { input, limit }) => {
            run_cli_videos(settings.with_video_limit(limit), &input).await
        }
        Some(Commands::Report { input, limit, json }) => {
            run_cli_report(settings.with_video_limit(limit), &input, json).await
        }
        Some(Commands::Tui) | None => run_tui(settings).await,
    };

    if let Err(e) = &result {
        error!(error = %e, unexpected = e.is_unexpected(), "command failed");
    }
    result
}

fn require_youtube_key(settings: &Settings) -> Result<String> {
    settings.youtube_api_key.clone().ok_or_else(|| {
        Error::configuration("YouTube API Key is required. Pass --api-key or set YOUTUBE_API_KEY.")
    })
}

async fn run_cli_channel(settings: &Settings, input: &str) -> Result<()> {
    let api_key = require_youtube_key(settings)?;
    let service = DashboardService::new(settings);

    println!("Resolving channel: {input}");
    let channel = service.resolver.resolve(input, &api_key).await?;
    print_channel(&channel);

    Ok(())
}

async fn run_cli_videos(settings: Settings, input: &str) -> Result<()> {
    let api_key = require_youtube_key(&settings)?;
    let service = DashboardService::new(&settings);

    println!("Fetching recent videos for: {input}");
    let snapshot = service.load(input, &api_key).await?;
    print_channel(&snapshot.channel);
    print_videos(&snapshot.videos);

    Ok(())
}

async fn run_cli_report(settings: Settings, input: &str, json: bool) -> Result<()> {
    let api_key = require_youtube_key(&settings)?;
    let service = DashboardService::new(&settings);

    if !json {
        println!("Fetching channel data: {input}");
    }
    let ChannelSnapshot { channel, videos } = service.load(input, &api_key).await?;

    if videos.is_empty() {
        return Err(Error::custom(
            "Channel has no uploads to analyze; a report needs at least one video.",
        ));
    }

    if !json {
        print_channel(&channel);
        print_videos(&videos);
        println!("Generating strategy report with {}...", service.reports.model());
    }

    let report = service.reports.generate_report(&channel, &videos).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, service.reports.model());
    }

    Ok(())
}

fn print_channel(channel: &ChannelRecord) {
    let stats = &channel.statistics;
    let subscribers = if stats.hidden_subscriber_count {
        "hidden".to_string()
    } else {
        format_count(stats.subscriber_count.as_deref())
    };

    println!();
    println!("{}", channel.snippet.title);
    if let Some(custom_url) = &channel.snippet.custom_url {
        println!("{custom_url}");
    }
    println!();
    println!("{:<20} {}", "Total Subscribers", subscribers);
    println!("{:<20} {}", "Total Views", format_count(stats.view_count.as_deref()));
    println!("{:<20} {}", "Video Count", format_count(stats.video_count.as_deref()));
}

fn print_videos(videos: &[VideoRecord]) {
    println!();
    if videos.is_empty() {
        println!("No videos found.");
        return;
    }

    println!("{:<4} {:<50} {:>8} {:>8} {:>8}", "#", "Title", "Views", "Likes", "Comments");
    for (i, video) in videos.iter().enumerate() {
        println!(
            "{:<4} {:<50} {:>8} {:>8} {:>8}",
            i + 1,
            ui::truncate(&video.snippet.title, 50),
            format_compact(video.views()),
            format_compact(video.likes()),
            format_compact(video.comments()),
        );
    }

    let metrics = aggregate(videos);
    println!();
    println!(
        "Average views: {}  Engagement: {}%",
        format_compact(metrics.average_views),
        metrics.engagement_rate_percent
    );
}

fn print_report(report: &StrategyReport, model: &str) {
    println!();
    println!("AI Strategy Report");
    println!("Generated at {} using {model}", report.generated_at);
    println!();
    println!("Executive Summary");
    for line in textwrap::wrap(&report.executive_summary, WRAP_WIDTH) {
        println!("  {line}");
    }

    println!();
    println!("Key Performance Insights");
    for insight in &report.key_insights {
        print_item("-", insight);
    }

    println!();
    println!("Strategic Suggestions");
    for (i, suggestion) in report.improvement_suggestions.iter().enumerate() {
        print_item(&format!("{}.", i + 1), suggestion);
    }
}

fn print_item(marker: &str, text: &str) {
    let initial = format!("  {marker} ");
    let subsequent = " ".repeat(initial.len());
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(&initial)
        .subsequent_indent(&subsequent);
    for line in textwrap::wrap(text, options) {
        println!("{line}");
    }
}

async fn run_tui(settings: Settings) -> Result<()> {
    let mut terminal = tui_init()?;

    let mut app = App::new(&settings);
    let event_handler = EventHandler::new();

    let result = async {
        loop {
            let event = event_handler.next_event()?;
            app.handle_event(event)?;

            terminal.draw(|f| {
                ui::draw(f, &mut app);
            })?;

            if app.should_quit {
                break;
            }
        }
        Ok::<(), Error>(())
    }
    .await;

    tui_restore()?;
    result
}
