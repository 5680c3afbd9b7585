use crate::config::Settings;
use crate::core::channel::ChannelResolver;
use crate::core::models::ChannelSnapshot;
use crate::core::report::ReportService;
use crate::core::videos::VideoFetcher;
use crate::core::youtube::YouTubeClient;
use crate::error::Result;
use tracing::info;

/// Resolver, fetcher and report generator wired to one set of settings.
#[derive(Clone)]
pub struct DashboardService {
    pub resolver: ChannelResolver,
    pub fetcher: VideoFetcher,
    pub reports: ReportService,
    pub video_limit: usize,
}

impl DashboardService {
    pub fn new(settings: &Settings) -> Self {
        let youtube = YouTubeClient::new(settings.youtube_base_url.clone());

        Self {
            resolver: ChannelResolver::new(youtube.clone()),
            fetcher: VideoFetcher::new(youtube),
            reports: ReportService::new(
                settings.gemini_base_url.clone(),
                settings.gemini_model.clone(),
                settings.gemini_api_key.clone(),
            ),
            video_limit: settings.video_limit,
        }
    }

    /// Channel lookup, then the uploads playlist, then video statistics.
    pub async fn load(&self, input: &str, api_key: &str) -> Result<ChannelSnapshot> {
        let channel = self.resolver.resolve(input, api_key).await?;
        let videos = self
            .fetcher
            .fetch_recent(channel.uploads_playlist_id(), api_key, self.video_limit)
            .await?;

        info!(channel = %channel.snippet.title, videos = videos.len(), "dashboard loaded");
        Ok(ChannelSnapshot { channel, videos })
    }
}
