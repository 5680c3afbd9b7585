use crate::core::metrics::{AggregateMetrics, aggregate};
use crate::core::models::{ChannelRecord, StrategyReport, VideoRecord};
use crate::core::youtube::error_message;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

const TEMPERATURE: f64 = 0.7;
const NOT_AVAILABLE: &str = "N/A";
const HIDDEN: &str = "hidden";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Data handed to the model, serialized as pretty JSON inside the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    pub channel_name: String,
    pub subscribers: String,
    pub total_channel_views: String,
    pub video_count: String,
    pub recent_videos_analysis: RecentVideosAnalysis,
    pub latest_video_title: String,
    pub latest_video_views: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentVideosAnalysis {
    pub count: usize,
    pub average_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub engagement_rate_percent: String,
}

impl PromptSummary {
    pub fn new(channel: &ChannelRecord, videos: &[VideoRecord]) -> Self {
        let AggregateMetrics {
            video_count,
            average_views,
            total_likes,
            total_comments,
            engagement_rate_percent,
            ..
        } = aggregate(videos);

        let latest = videos.first();
        let stat = |value: &Option<String>| value.clone().unwrap_or_else(|| "0".to_string());

        Self {
            channel_name: channel.snippet.title.clone(),
            subscribers: if channel.statistics.hidden_subscriber_count {
                HIDDEN.to_string()
            } else {
                stat(&channel.statistics.subscriber_count)
            },
            total_channel_views: stat(&channel.statistics.view_count),
            video_count: stat(&channel.statistics.video_count),
            recent_videos_analysis: RecentVideosAnalysis {
                count: video_count,
                average_views,
                total_likes,
                total_comments,
                engagement_rate_percent,
            },
            latest_video_title: latest
                .map(|v| v.snippet.title.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            latest_video_views: latest
                .and_then(|v| v.statistics.view_count.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

pub fn build_prompt(summary: &PromptSummary) -> Result<String> {
    let data = serde_json::to_string_pretty(summary)?;

    Ok(format!(
        "You are a professional Social Media Analyst.
Analyze the following YouTube Channel Real-Time Data:
{data}

Your task is to generate a performance report.
- Executive Summary: A high-level overview of health and trajectory.
- Key Insights: Identify trends (e.g., \"Views are spiking on recent uploads\" or \"Engagement is low compared to subscriber count\").
- Suggestions: Concrete actions (e.g., \"Focus on Shorts\" or \"Optimize titles for CTR\").

Keep the tone professional, encouraging, and data-backed. No jargon.
"
    ))
}

/// Response schema in Gemini's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": {
                "type": "STRING",
                "description": "A concise professional summary of the channel's current performance status."
            },
            "keyInsights": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 distinct, data-driven observations about views, engagement, or growth."
            },
            "improvementSuggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "2 actionable pieces of advice to improve channel performance."
            }
        },
        "required": ["executiveSummary", "keyInsights", "improvementSuggestions"]
    })
}

/// The model's JSON, checked locally: the provider's schema support is best effort.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportPayload {
    executive_summary: String,
    key_insights: Vec<String>,
    improvement_suggestions: Vec<String>,
}

pub fn parse_report(text: &str, generated_at: String) -> Result<StrategyReport> {
    let payload: ReportPayload = serde_json::from_str(text.trim()).map_err(|e| {
        warn!(error = %e, "model output does not match the report schema");
        Error::generation(format!("Report did not match the expected format: {e}"))
    })?;

    Ok(StrategyReport {
        executive_summary: payload.executive_summary,
        key_insights: payload.key_insights,
        improvement_suggestions: payload.improvement_suggestions,
        generated_at,
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Clone)]
pub struct ReportService {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ReportService {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_report(
        &self,
        channel: &ChannelRecord,
        videos: &[VideoRecord],
    ) -> Result<StrategyReport> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(
                    "Gemini API Key is missing. Set GEMINI_API_KEY in the environment.",
                )
            })?;

        let summary = PromptSummary::new(channel, videos);
        let prompt = build_prompt(&summary)?;

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": TEMPERATURE
            }
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        info!(model = %self.model, channel = %summary.channel_name, "requesting strategy report");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        let raw: Value = response
            .json()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        if let Some(message) = error_message(&raw) {
            warn!(%status, %message, "gemini returned an error");
            return Err(Error::upstream(message));
        }
        if !status.is_success() {
            return Err(Error::upstream(format!(
                "Gemini request failed with status {status}"
            )));
        }

        let decoded: GenerateContentResponse = serde_json::from_value(raw)?;
        let text = decoded
            .text()
            .ok_or_else(|| Error::generation("No response generated from Gemini."))?;

        let report = parse_report(&text, generated_at())?;
        info!(
            insights = report.key_insights.len(),
            suggestions = report.improvement_suggestions.len(),
            "strategy report generated"
        );
        Ok(report)
    }
}

fn generated_at() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}
