use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tubelens")]
#[command(about = "YouTube channel metrics dashboard with AI strategy reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube Data API v3 key (kept in memory only)
    #[arg(long, global = true, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model used for strategy reports
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show channel statistics
    Channel {
        /// Channel handle (@name), channel id (UC...) or channel URL
        input: String,
    },

    /// List the most recent uploads with their statistics
    Videos {
        /// Channel handle (@name), channel id (UC...) or channel URL
        input: String,

        /// Number of recent videos to fetch (max 50)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fetch metrics and generate a strategy report
    Report {
        /// Channel handle (@name), channel id (UC...) or channel URL
        input: String,

        /// Number of recent videos to analyze (max 50)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive dashboard
    Tui,
}
