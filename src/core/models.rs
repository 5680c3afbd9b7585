//! Resource shapes returned by the YouTube Data API v3 and the report type
//! produced by the generator.
//!
//! Counters are kept as the decimal strings the API sends; use [`count`] to
//! read them as integers.

use serde::{Deserialize, Serialize};

/// Parses an upstream statistic. Absent or unparsable values count as zero.
pub fn count(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelThumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: ChannelThumbnails,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    /// Omitted by the API when the owner hides it.
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub hidden_subscriber_count: bool,
    #[serde(default)]
    pub video_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub likes: Option<String>,
    pub uploads: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

/// A `channel` resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: String,
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
    pub content_details: ChannelContentDetails,
}

impl ChannelRecord {
    pub fn uploads_playlist_id(&self) -> &str {
        &self.content_details.related_playlists.uploads
    }

    pub fn view_count(&self) -> u64 {
        count(self.statistics.view_count.as_deref())
    }

    pub fn subscriber_count(&self) -> u64 {
        count(self.statistics.subscriber_count.as_deref())
    }

    pub fn video_count(&self) -> u64 {
        count(self.statistics.video_count.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoThumbnails {
    #[serde(default)]
    pub medium: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: VideoThumbnails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    /// Omitted when the uploader disables ratings.
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub favorite_count: Option<String>,
    /// Omitted when comments are disabled.
    #[serde(default)]
    pub comment_count: Option<String>,
}

/// A `video` resource (snippet + statistics parts).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

impl VideoRecord {
    pub fn views(&self) -> u64 {
        count(self.statistics.view_count.as_deref())
    }

    pub fn likes(&self) -> u64 {
        count(self.statistics.like_count.as_deref())
    }

    pub fn comments(&self) -> u64 {
        count(self.statistics.comment_count.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub content_details: PlaylistItemContentDetails,
}

/// Generic `*ListResponse` envelope; only `items` matters here.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Channel plus its most recent uploads, as loaded by one dashboard refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
    pub channel: ChannelRecord,
    pub videos: Vec<VideoRecord>,
}

/// Structured output of the report generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub executive_summary: String,
    pub key_insights: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub generated_at: String,
}
