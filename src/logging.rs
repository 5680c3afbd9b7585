use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "tubelens.log";

/// Routes `tracing` output to a log file; the terminal belongs to the TUI.
/// Keep the guard alive until exit or buffered lines are lost.
///
/// Returns `None`, leaving logging off, when no log directory is writable.
pub fn init() -> Option<WorkerGuard> {
    let dir = first_usable_dir(&log_dirs())?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Some(guard)
}

/// Platform data dir first, then the temp dir.
fn log_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(project) = ProjectDirs::from("", "", "tubelens") {
        dirs.push(project.data_local_dir().join("logs"));
    }
    dirs.push(std::env::temp_dir().join("tubelens"));
    dirs
}

fn first_usable_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| std::fs::create_dir_all(dir).is_ok())
        .cloned()
}
