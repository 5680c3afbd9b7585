use crate::config::DEFAULT_CHANNEL_INPUT;
use crate::core::models::{ChannelSnapshot, StrategyReport};
use crate::error::Result;
use tracing::{debug, warn};

/// Progress of one pipeline: `Idle -> Loading -> {Success, Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction {
    Start { input: String, api_key: String },
    NeedsApiKey,
    Ignored,
}

/// Everything the dashboard shows, mutated only through the transition
/// methods below.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub youtube_api_key: String,
    pub channel_input: String,
    pub snapshot: Option<ChannelSnapshot>,
    pub report: Option<StrategyReport>,
    pub fetch: Phase,
    pub analysis: Phase,
    pub error: Option<String>,
    pub show_settings: bool,
    /// Bumped by every fetch; reports started under an older value are stale.
    generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DashboardState {
    pub fn new(youtube_api_key: Option<String>) -> Self {
        Self {
            youtube_api_key: youtube_api_key.unwrap_or_default(),
            channel_input: DEFAULT_CHANNEL_INPUT.to_string(),
            snapshot: None,
            report: None,
            fetch: Phase::Idle,
            analysis: Phase::Idle,
            error: None,
            show_settings: false,
            generation: 0,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.youtube_api_key.trim().is_empty()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch == Phase::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis == Phase::Loading
    }

    pub fn can_generate_report(&self) -> bool {
        !self.is_analyzing()
            && self
                .snapshot
                .as_ref()
                .is_some_and(|snapshot| !snapshot.videos.is_empty())
    }

    pub fn begin_fetch(&mut self) -> FetchAction {
        if !self.has_api_key() {
            self.show_settings = true;
            return FetchAction::NeedsApiKey;
        }

        let input = self.channel_input.trim();
        if input.is_empty() || self.is_fetching() {
            return FetchAction::Ignored;
        }
        let input = input.to_string();

        self.fetch = Phase::Loading;
        self.error = None;
        self.report = None;
        self.generation += 1;
        if self.is_analyzing() {
            self.analysis = Phase::Idle;
        }

        FetchAction::Start {
            input,
            api_key: self.youtube_api_key.trim().to_string(),
        }
    }

    pub fn finish_fetch(&mut self, result: Result<ChannelSnapshot>) {
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.fetch = Phase::Success;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "channel fetch failed");
                self.fetch = Phase::Error;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Returns whether generation should start. Pass [`Self::generation`]
    /// from this moment to [`Self::finish_report`].
    pub fn begin_report(&mut self) -> bool {
        if !self.can_generate_report() {
            return false;
        }
        self.analysis = Phase::Loading;
        true
    }

    /// Results from a generation older than the current snapshot are dropped.
    pub fn finish_report(&mut self, generation: u64, result: Result<StrategyReport>) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale report");
            return;
        }

        match result {
            Ok(report) => {
                self.report = Some(report);
                self.analysis = Phase::Success;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "report generation failed");
                self.analysis = Phase::Error;
                self.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ChannelRecord, VideoRecord};
    use crate::error::Error;

    fn snapshot(videos: usize) -> ChannelSnapshot {
        ChannelSnapshot {
            channel: ChannelRecord {
                id: "UC1".to_string(),
                ..Default::default()
            },
            videos: (0..videos)
                .map(|i| VideoRecord {
                    id: format!("v{i}"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn report(summary: &str) -> StrategyReport {
        StrategyReport {
            executive_summary: summary.to_string(),
            key_insights: vec![],
            improvement_suggestions: vec![],
            generated_at: "1:00:00 PM".to_string(),
        }
    }

    #[test]
    fn missing_key_opens_settings() {
        let mut state = DashboardState::new(None);
        assert_eq!(state.begin_fetch(), FetchAction::NeedsApiKey);
        assert!(state.show_settings);
        assert_eq!(state.fetch, Phase::Idle);
    }

    #[test]
    fn empty_input_is_ignored() {
        let mut state = DashboardState::new(Some("key".to_string()));
        state.channel_input = "   ".to_string();
        assert_eq!(state.begin_fetch(), FetchAction::Ignored);
        assert_eq!(state.fetch, Phase::Idle);
    }

    #[test]
    fn fetch_is_not_reentrant() {
        let mut state = DashboardState::new(Some("key".to_string()));
        assert!(matches!(state.begin_fetch(), FetchAction::Start { .. }));
        assert!(state.is_fetching());
        assert_eq!(state.begin_fetch(), FetchAction::Ignored);
    }

    #[test]
    fn new_fetch_clears_error_and_report() {
        let mut state = DashboardState::new(Some(" key ".to_string()));
        state.error = Some("old".to_string());
        state.report = Some(report("old"));

        let action = state.begin_fetch();
        assert_eq!(
            action,
            FetchAction::Start {
                input: "@GoogleDevelopers".to_string(),
                api_key: "key".to_string()
            }
        );
        assert!(state.error.is_none());
        assert!(state.report.is_none());
    }

    #[test]
    fn failed_fetch_keeps_previous_snapshot() {
        let mut state = DashboardState::new(Some("key".to_string()));
        state.begin_fetch();
        state.finish_fetch(Ok(snapshot(2)));
        assert_eq!(state.fetch, Phase::Success);

        state.begin_fetch();
        state.finish_fetch(Err(Error::NotFound("Channel not found.".to_string())));
        assert_eq!(state.fetch, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("Channel not found."));
        assert_eq!(state.snapshot.as_ref().map(|s| s.videos.len()), Some(2));
    }

    #[test]
    fn report_requires_videos() {
        let mut state = DashboardState::new(Some("key".to_string()));
        assert!(!state.begin_report());

        state.finish_fetch(Ok(snapshot(0)));
        assert!(!state.begin_report());

        state.finish_fetch(Ok(snapshot(1)));
        assert!(state.begin_report());
        assert!(!state.begin_report(), "generation must not be re-entered");
    }

    #[test]
    fn report_success_replaces_and_clears_error() {
        let mut state = DashboardState::new(Some("key".to_string()));
        state.finish_fetch(Ok(snapshot(3)));

        state.begin_report();
        let generation = state.generation();
        state.finish_report(
            generation,
            Err(Error::generation("No response generated from Gemini.")),
        );
        assert_eq!(state.analysis, Phase::Error);
        assert!(state.error.is_some());

        state.begin_report();
        state.finish_report(state.generation(), Ok(report("first")));
        state.begin_report();
        state.finish_report(state.generation(), Ok(report("second")));

        assert!(state.error.is_none());
        assert_eq!(
            state.report.as_ref().map(|r| r.executive_summary.as_str()),
            Some("second")
        );
    }

    #[test]
    fn report_for_a_replaced_channel_is_dropped() {
        let mut state = DashboardState::new(Some("key".to_string()));
        state.begin_fetch();
        state.finish_fetch(Ok(snapshot(2)));

        assert!(state.begin_report());
        let started_under = state.generation();

        state.channel_input = "@other".to_string();
        assert!(matches!(state.begin_fetch(), FetchAction::Start { .. }));
        assert!(!state.is_analyzing());
        let mut other = snapshot(1);
        other.channel.id = "UC2".to_string();
        state.finish_fetch(Ok(other));

        state.finish_report(started_under, Ok(report("about the first channel")));
        assert!(state.report.is_none());
        assert_eq!(state.analysis, Phase::Idle);
        assert_eq!(state.snapshot.as_ref().map(|s| s.channel.id.as_str()), Some("UC2"));

        assert!(state.begin_report());
        state.finish_report(state.generation(), Ok(report("about UC2")));
        assert_eq!(
            state.report.as_ref().map(|r| r.executive_summary.as_str()),
            Some("about UC2")
        );
    }

    #[test]
    fn failed_regeneration_keeps_previous_report() {
        let mut state = DashboardState::new(Some("key".to_string()));
        state.finish_fetch(Ok(snapshot(1)));
        state.begin_report();
        state.finish_report(state.generation(), Ok(report("kept")));

        state.begin_report();
        let generation = state.generation();
        state.finish_report(
            generation,
            Err(Error::configuration("Gemini API Key is missing.")),
        );
        assert_eq!(
            state.report.as_ref().map(|r| r.executive_summary.as_str()),
            Some("kept")
        );
    }
}
