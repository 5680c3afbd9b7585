use crate::error::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub const CHANNEL_PARTS: &str = "snippet,contentDetails,statistics";
pub const PLAYLIST_ITEM_PARTS: &str = "snippet,contentDetails";
pub const VIDEO_PARTS: &str = "snippet,statistics";

/// Minimal YouTube Data API v3 client. The API key travels as the `key`
/// query parameter on every request.
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GETs `{base}/{resource}` and decodes the body, surfacing the
    /// provider's `error.message` as [`Error::Upstream`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        api_key: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{resource}", self.base_url);
        debug!(%url, ?params, "youtube request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        let body: Value = response.json().await.map_err(redact)?;

        if let Some(message) = error_message(&body) {
            warn!(resource, %status, %message, "youtube api returned an error");
            return Err(Error::upstream(message));
        }

        if !status.is_success() {
            warn!(resource, %status, "youtube api returned a non-success status");
            return Err(Error::upstream(format!(
                "YouTube API request failed with status {status}"
            )));
        }

        Ok(serde_json::from_value(body)?)
    }
}

/// Drops the request URL from transport errors; it carries the API key.
fn redact(e: reqwest::Error) -> Error {
    Error::Http(e.without_url())
}

/// Extracts the message of a top-level `error` envelope, if present.
pub fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if error.is_null() {
        return None;
    }

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());

    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn transport_errors_do_not_leak_the_key() {
        let client = YouTubeClient::new("http://127.0.0.1:9");
        let err = client
            .get::<Value>("channels", "AIzaSECRET123", &[("part", "snippet")])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("AIzaSECRET123"));
    }

    #[test]
    fn reads_google_error_envelope() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "errors": [{ "reason": "badRequest" }]
            }
        });
        assert_eq!(
            error_message(&body).as_deref(),
            Some("API key not valid. Please pass a valid API key.")
        );
    }

    #[test]
    fn ignores_bodies_without_error() {
        assert_eq!(error_message(&json!({ "items": [] })), None);
        assert_eq!(error_message(&json!({ "error": null })), None);
    }

    #[test]
    fn falls_back_to_raw_error_value() {
        assert_eq!(
            error_message(&json!({ "error": "quotaExceeded" })).as_deref(),
            Some("quotaExceeded")
        );
    }
}
