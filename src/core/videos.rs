use crate::core::models::{ListResponse, PlaylistItem, VideoRecord};
use crate::core::youtube::{PLAYLIST_ITEM_PARTS, VIDEO_PARTS, YouTubeClient};
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Largest page the `playlistItems` resource will return.
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct VideoFetcher {
    client: YouTubeClient,
}

impl VideoFetcher {
    pub fn new(client: YouTubeClient) -> Self {
        Self { client }
    }

    /// Fetches up to `limit` of the newest uploads, most recent first.
    ///
    /// Two requests: one page of playlist items, then one batch `videos`
    /// lookup for their statistics. The batch response order is not
    /// guaranteed, so results are put back into playlist order.
    pub async fn fetch_recent(
        &self,
        uploads_playlist_id: &str,
        api_key: &str,
        limit: usize,
    ) -> Result<Vec<VideoRecord>> {
        if api_key.trim().is_empty() {
            return Err(Error::configuration("YouTube API Key is required"));
        }

        let limit = limit.min(MAX_PAGE_SIZE);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let max_results = limit.to_string();
        let playlist: ListResponse<PlaylistItem> = self
            .client
            .get(
                "playlistItems",
                api_key,
                &[
                    ("part", PLAYLIST_ITEM_PARTS),
                    ("playlistId", uploads_playlist_id),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let video_ids: Vec<String> = playlist
            .items
            .into_iter()
            .filter_map(|item| item.content_details.video_id)
            .filter(|id| !id.is_empty())
            .take(limit)
            .collect();

        if video_ids.is_empty() {
            info!(uploads_playlist_id, "uploads playlist is empty");
            return Ok(Vec::new());
        }

        let joined = video_ids.join(",");
        debug!(count = video_ids.len(), "fetching video statistics");

        let videos: ListResponse<VideoRecord> = self
            .client
            .get("videos", api_key, &[("part", VIDEO_PARTS), ("id", joined.as_str())])
            .await?;

        let ordered = restore_playlist_order(&video_ids, videos.items);
        info!(count = ordered.len(), "recent videos fetched");
        Ok(ordered)
    }
}

/// Reorders `videos` to follow `ids`. Ids with no matching video are
/// skipped, as are videos nobody asked for.
pub fn restore_playlist_order(ids: &[String], videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut by_id: HashMap<String, VideoRecord> = videos
        .into_iter()
        .map(|video| (video.id.clone(), video))
        .collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
