use crate::config::Settings;
use crate::core::{
    ChannelSnapshot, DashboardService, DashboardState, FetchAction, Phase, StrategyReport,
};
use crate::error::Result;
use crate::tui::components::{ActivityLog, InputField, ReportViewer, VideoList};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Videos,
    Report,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Videos,
            Focus::Videos => Focus::Report,
            Focus::Report => Focus::Search,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Search => Focus::Report,
            Focus::Videos => Focus::Search,
            Focus::Report => Focus::Videos,
        }
    }
}

/// Results sent back from spawned pipeline tasks.
pub enum AppMessage {
    Fetched(Result<ChannelSnapshot>),
    /// Tagged with the fetch generation the report was started under.
    Reported(u64, Result<StrategyReport>),
}

pub struct App {
    pub state: DashboardState,
    pub should_quit: bool,
    pub focus: Focus,

    pub search_input: InputField,
    pub key_input: InputField,
    pub video_list: VideoList,
    pub report_viewer: ReportViewer,
    pub viewer_height: u16,
    pub activity: ActivityLog,

    pub service: DashboardService,

    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let state = DashboardState::new(settings.youtube_api_key.clone());
        let (tx, rx) = mpsc::unbounded_channel();

        let mut search_input = InputField::new("Channel", "@handle, UC... id or channel URL")
            .with_value(&state.channel_input);
        search_input.focused = true;

        let key_input = InputField::new("YouTube API Key", "AIzaSy...")
            .masked()
            .with_value(&state.youtube_api_key);

        let mut activity = ActivityLog::new();
        if state.has_api_key() {
            activity.set_message("Press Enter to load the channel.");
        } else {
            activity.set_message("YouTube API key required. Press Ctrl+K to add one.");
        }

        Self {
            state,
            should_quit: false,
            focus: Focus::Search,

            search_input,
            key_input,
            video_list: VideoList::new(Vec::new()),
            report_viewer: ReportViewer::new(),
            viewer_height: 0,
            activity,

            service: DashboardService::new(settings),

            tx,
            rx,
        }
    }

    pub fn model(&self) -> &str {
        self.service.reports.model()
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Tick => self.handle_tick(),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.show_settings {
            self.handle_settings_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('k') if ctrl => self.open_settings(),
            KeyCode::Char('g') if ctrl => self.start_report(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.previous()),
            _ => match self.focus {
                Focus::Search => self.handle_search_key(key),
                Focus::Videos => {
                    if key.code == KeyCode::Char('q') {
                        self.should_quit = true;
                    } else {
                        self.video_list.handle_key(key);
                    }
                }
                Focus::Report => {
                    if key.code == KeyCode::Char('q') {
                        self.should_quit = true;
                    } else {
                        self.report_viewer.handle_key(key, self.viewer_height as usize);
                    }
                }
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.start_fetch();
            return;
        }
        if self.search_input.handle_key(key) {
            self.state.channel_input = self.search_input.value.clone();
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.key_input.set_value(&self.state.youtube_api_key);
                self.state.show_settings = false;
            }
            KeyCode::Enter => {
                self.state.youtube_api_key = self.key_input.value.trim().to_string();
                self.state.show_settings = false;
                if self.state.has_api_key() {
                    self.activity.set_message("API key saved. Press Enter to load the channel.");
                    self.activity.add_log("YouTube API key updated");
                } else {
                    self.activity
                        .set_message("YouTube API key required. Press Ctrl+K to add one.");
                }
            }
            _ => {
                self.key_input.handle_key(key);
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.show_settings {
            return;
        }
        match self.focus {
            Focus::Videos => {
                self.video_list.handle_mouse(mouse);
            }
            Focus::Report => {
                self.report_viewer.handle_mouse(mouse, self.viewer_height as usize);
            }
            Focus::Search => {}
        }
    }

    fn handle_tick(&mut self) {
        if self.state.is_fetching() || self.state.is_analyzing() {
            self.activity.tick();
        }

        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }

        for message in messages {
            match message {
                AppMessage::Fetched(result) => self.on_fetched(result),
                AppMessage::Reported(generation, result) => {
                    self.on_reported(generation, result)
                }
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.search_input.focused = focus == Focus::Search;
    }

    fn open_settings(&mut self) {
        self.key_input.set_value(&self.state.youtube_api_key);
        self.key_input.focused = true;
        self.state.show_settings = true;
    }

    fn start_fetch(&mut self) {
        self.state.channel_input = self.search_input.value.clone();

        match self.state.begin_fetch() {
            FetchAction::Start { input, api_key } => {
                self.report_viewer.clear();
                self.activity.set_message(format!("Fetching {input}..."));
                self.activity.add_log(format!("Loading channel {input}"));
                info!(input = %input, "dashboard fetch started");

                let service = self.service.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = service.load(&input, &api_key).await;
                    let _ = tx.send(AppMessage::Fetched(result));
                });
            }
            FetchAction::NeedsApiKey => {
                self.open_settings();
                self.activity
                    .set_message("YouTube API key required. Press Ctrl+K to add one.");
            }
            FetchAction::Ignored => {}
        }
    }

    fn start_report(&mut self) {
        let Some(snapshot) = self.state.snapshot.clone() else {
            return;
        };
        if !self.state.begin_report() {
            return;
        }
        let generation = self.state.generation();

        self.activity
            .set_message(format!("Generating report with {}...", self.model()));
        self.activity.add_log("Analyzing channel performance");

        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service
                .reports
                .generate_report(&snapshot.channel, &snapshot.videos)
                .await;
            let _ = tx.send(AppMessage::Reported(generation, result));
        });
    }

    fn on_fetched(&mut self, result: Result<ChannelSnapshot>) {
        if let Err(e) = &result {
            self.activity.add_log(format!("Fetch failed: {e}"));
        }
        self.state.finish_fetch(result);

        if self.state.fetch == Phase::Success
            && let Some(snapshot) = &self.state.snapshot
        {
            self.video_list.update_items(snapshot.videos.clone());
            let message = format!(
                "Loaded {} with {} recent videos. Ctrl+G generates a report.",
                snapshot.channel.snippet.title,
                snapshot.videos.len()
            );
            self.activity.add_log(format!(
                "Loaded {} videos from {}",
                snapshot.videos.len(),
                snapshot.channel.snippet.title
            ));
            self.activity.set_message(message);
        } else {
            self.activity.set_message("Fetch failed.");
        }
    }

    fn on_reported(&mut self, generation: u64, result: Result<StrategyReport>) {
        if generation != self.state.generation() {
            self.activity.add_log("Discarded a report for a previous channel");
            return;
        }
        if let Err(e) = &result {
            self.activity.add_log(format!("Report failed: {e}"));
        }
        self.state.finish_report(generation, result);

        if self.state.analysis == Phase::Success
            && let Some(report) = &self.state.report
        {
            let model = self.service.reports.model().to_string();
            self.report_viewer.set_report(report, &model);
            self.activity.add_log("Report ready");
            self.activity.set_message("Report ready. Ctrl+G regenerates it.");
            self.set_focus(Focus::Report);
        } else {
            self.activity.set_message("Report generation failed.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelRecord, VideoRecord};
    use crate::error::Error;

    fn app(key: Option<&str>) -> App {
        let settings = Settings::default().with_youtube_api_key(key.map(str::to_string));
        App::new(&settings)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_key(KeyEvent::new(code, modifiers));
    }

    fn report(summary: &str) -> StrategyReport {
        StrategyReport {
            executive_summary: summary.to_string(),
            key_insights: vec!["one".to_string()],
            improvement_suggestions: vec!["two".to_string()],
            generated_at: "9:15:00 AM".to_string(),
        }
    }

    fn snapshot(videos: usize) -> ChannelSnapshot {
        ChannelSnapshot {
            channel: ChannelRecord::default(),
            videos: (0..videos)
                .map(|i| VideoRecord {
                    id: format!("v{i}"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn enter_without_key_opens_modal() {
        let mut app = app(None);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.state.show_settings);
        assert!(!app.state.is_fetching());
    }

    #[test]
    fn modal_saves_trimmed_key_on_enter() {
        let mut app = app(None);
        press(&mut app, KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(app.state.show_settings);

        for c in " abc ".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(!app.state.show_settings);
        assert_eq!(app.state.youtube_api_key, "abc");
        assert!(!app.should_quit);
    }

    #[test]
    fn modal_escape_discards_edits() {
        let mut app = app(Some("kept"));
        press(&mut app, KeyCode::Char('k'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);

        assert!(!app.state.show_settings);
        assert_eq!(app.state.youtube_api_key, "kept");
        assert!(!app.should_quit);
    }

    #[test]
    fn typing_updates_channel_input() {
        let mut app = app(Some("key"));
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.state.channel_input, "@GoogleDevelopersx");
    }

    #[test]
    fn tab_cycles_focus() {
        let mut app = app(Some("key"));
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Videos);
        assert!(!app.search_input.focused);
        press(&mut app, KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Search);
    }

    #[test]
    fn fetched_snapshot_fills_video_list() {
        let mut app = app(Some("key"));
        app.on_fetched(Ok(snapshot(3)));
        assert_eq!(app.video_list.items.len(), 3);
        assert_eq!(app.state.fetch, Phase::Success);
    }

    #[test]
    fn failed_fetch_surfaces_error() {
        let mut app = app(Some("key"));
        app.on_fetched(Err(Error::NotFound(
            "Channel not found. Please check the ID or Handle.".to_string(),
        )));
        assert_eq!(app.state.fetch, Phase::Error);
        assert_eq!(
            app.state.error.as_deref(),
            Some("Channel not found. Please check the ID or Handle.")
        );
    }

    #[test]
    fn report_shortcut_needs_videos() {
        let mut app = app(Some("key"));
        press(&mut app, KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert!(!app.state.is_analyzing());

        app.on_fetched(Ok(snapshot(0)));
        press(&mut app, KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert!(!app.state.is_analyzing());
    }

    #[test]
    fn report_lands_in_viewer() {
        let mut app = app(Some("key"));
        app.on_fetched(Ok(snapshot(1)));
        let generation = app.state.generation();
        app.on_reported(generation, Ok(report("Growing.")));

        assert!(!app.report_viewer.is_empty());
        assert_eq!(app.focus, Focus::Report);
    }

    #[test]
    fn report_started_before_a_new_fetch_is_discarded() {
        let mut app = app(Some("key"));
        app.on_fetched(Ok(snapshot(2)));
        assert!(app.state.begin_report());
        let started_under = app.state.generation();

        assert!(matches!(app.state.begin_fetch(), FetchAction::Start { .. }));
        app.on_fetched(Ok(snapshot(1)));
        app.on_reported(started_under, Ok(report("Old channel.")));

        assert!(app.report_viewer.is_empty());
        assert!(app.state.report.is_none());
        assert_eq!(app.focus, Focus::Search);
    }
}
