use crate::core::models::{VideoRecord, count};
use serde::Serialize;

/// Scalar summary of a set of recent videos. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub video_count: usize,
    pub total_views: u64,
    pub average_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    /// `(likes + comments) / views * 100` to two decimals, or `"0"`.
    pub engagement_rate_percent: String,
}

pub fn aggregate(videos: &[VideoRecord]) -> AggregateMetrics {
    let total_views = videos.iter().fold(0u64, |acc, v| acc.saturating_add(v.views()));
    let total_likes = videos.iter().fold(0u64, |acc, v| acc.saturating_add(v.likes()));
    let total_comments = videos
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(v.comments()));

    let average_views = if videos.is_empty() {
        0
    } else {
        (total_views as f64 / videos.len() as f64).round() as u64
    };

    let engagement_rate_percent = if total_views == 0 {
        "0".to_string()
    } else {
        let interactions = total_likes.saturating_add(total_comments) as f64;
        format!("{:.2}", interactions / total_views as f64 * 100.0)
    };

    AggregateMetrics {
        video_count: videos.len(),
        total_views,
        average_views,
        total_likes,
        total_comments,
        engagement_rate_percent,
    }
}

const COMPACT_UNITS: [(f64, &str); 4] = [
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
];

/// Short compact notation in the en-US style: `42`, `1.2K`, `500K`, `1M`.
pub fn format_compact(value: u64) -> String {
    if value < 1000 {
        return value.to_string();
    }

    let n = value as f64;
    let mut idx = COMPACT_UNITS
        .iter()
        .rposition(|(scale, _)| n >= *scale)
        .unwrap_or(0);

    loop {
        let (scale, suffix) = COMPACT_UNITS[idx];
        let scaled = n / scale;
        // Two significant digits below 10, whole numbers above.
        let rounded = if scaled < 10.0 {
            (scaled * 10.0).round() / 10.0
        } else {
            scaled.round()
        };

        if rounded >= 1000.0 && idx + 1 < COMPACT_UNITS.len() {
            idx += 1;
            continue;
        }

        return if rounded.fract() == 0.0 {
            format!("{}{suffix}", rounded as u64)
        } else {
            format!("{rounded:.1}{suffix}")
        };
    }
}

/// [`format_compact`] over a decimal-string statistic.
pub fn format_count(raw: Option<&str>) -> String {
    format_compact(count(raw))
}
