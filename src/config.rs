use std::env;

pub const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CHANNEL_INPUT: &str = "@GoogleDevelopers";
pub const DEFAULT_VIDEO_LIMIT: usize = 10;

const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
const GEMINI_KEY_FALLBACK_ENV: &str = "API_KEY";
const YOUTUBE_BASE_URL_ENV: &str = "TUBELENS_YOUTUBE_BASE_URL";
const GEMINI_BASE_URL_ENV: &str = "TUBELENS_GEMINI_BASE_URL";

/// Runtime settings assembled from CLI flags and the process environment.
/// Nothing here is ever written back to disk.
#[derive(Debug, Clone)]
pub struct Settings {
    pub youtube_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub youtube_base_url: String,
    pub gemini_base_url: String,
    pub video_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            youtube_base_url: YOUTUBE_BASE_URL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            video_limit: DEFAULT_VIDEO_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var(GEMINI_KEY_ENV)
                .or_else(|| non_empty_var(GEMINI_KEY_FALLBACK_ENV)),
            youtube_base_url: non_empty_var(YOUTUBE_BASE_URL_ENV)
                .unwrap_or_else(|| YOUTUBE_BASE_URL.to_string()),
            gemini_base_url: non_empty_var(GEMINI_BASE_URL_ENV)
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            ..Self::default()
        }
    }

    pub fn with_youtube_api_key(mut self, key: Option<String>) -> Self {
        self.youtube_api_key = key.and_then(|k| non_empty(&k));
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.and_then(|m| non_empty(&m)) {
            self.gemini_model = model;
        }
        self
    }

    pub fn with_video_limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.video_limit = limit;
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|v| non_empty(&v))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_ignores_blank_values() {
        let settings = Settings::default()
            .with_youtube_api_key(Some("   ".to_string()))
            .with_model(Some(String::new()))
            .with_video_limit(None);

        assert!(settings.youtube_api_key.is_none());
        assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(settings.video_limit, DEFAULT_VIDEO_LIMIT);
    }

    #[test]
    fn builder_trims_keys() {
        let settings = Settings::default()
            .with_youtube_api_key(Some(" AIzaSy-test \n".to_string()))
            .with_model(Some("gemini-2.5-pro".to_string()))
            .with_video_limit(Some(25));

        assert_eq!(settings.youtube_api_key.as_deref(), Some("AIzaSy-test"));
        assert_eq!(settings.gemini_model, "gemini-2.5-pro");
        assert_eq!(settings.video_limit, 25);
    }
}
