use crate::core::models::{ChannelRecord, ListResponse};
use crate::core::youtube::{CHANNEL_PARTS, YouTubeClient};
use crate::error::{Error, Result};
use tracing::info;

const URL_PREFIXES: &[&str] = &["https://", "http://"];
const HOST_PREFIXES: &[&str] = &["www.", "m."];
const HOST: &str = "youtube.com/";
const CHANNEL_SEGMENT: &str = "channel/";

/// How a user-supplied identifier is looked up on the `channels` resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    /// `forHandle=@name`
    Handle(String),
    /// `id=UC...`
    Id(String),
}

impl ChannelLookup {
    /// Classifies a handle, channel id or channel URL.
    pub fn parse(input: &str) -> Result<Self> {
        let cleaned = clean_identifier(input);

        if cleaned.is_empty() {
            return Err(Error::custom("Channel identifier cannot be empty"));
        }

        let lookup = if cleaned.starts_with('@') {
            Self::Handle(cleaned.to_string())
        } else if cleaned.starts_with("UC") {
            Self::Id(cleaned.to_string())
        } else {
            Self::Handle(format!("@{cleaned}"))
        };

        Ok(lookup)
    }

    pub fn query_param(&self) -> (&'static str, &str) {
        match self {
            Self::Handle(handle) => ("forHandle", handle),
            Self::Id(id) => ("id", id),
        }
    }
}

/// Strips URL scheme/host, a `channel/` segment, and anything after the
/// first remaining path segment.
fn clean_identifier(input: &str) -> &str {
    let mut rest = input.trim();

    for prefix in URL_PREFIXES {
        if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
            rest = stripped;
            break;
        }
    }
    for prefix in HOST_PREFIXES {
        if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, HOST) {
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_prefix(CHANNEL_SEGMENT) {
        rest = stripped;
    }

    rest.split(['/', '?', '#']).next().unwrap_or_default().trim()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

#[derive(Clone)]
pub struct ChannelResolver {
    client: YouTubeClient,
}

impl ChannelResolver {
    pub fn new(client: YouTubeClient) -> Self {
        Self { client }
    }

    /// Looks up exactly one channel. No disambiguation: the first match wins.
    pub async fn resolve(&self, identifier: &str, api_key: &str) -> Result<ChannelRecord> {
        if api_key.trim().is_empty() {
            return Err(Error::configuration("YouTube API Key is required"));
        }

        let lookup = ChannelLookup::parse(identifier)?;
        let (param, value) = lookup.query_param();
        info!(param, value, "resolving channel");

        let response: ListResponse<ChannelRecord> = self
            .client
            .get(
                "channels",
                api_key,
                &[("part", CHANNEL_PARTS), (param, value)],
            )
            .await?;

        let channel = response.items.into_iter().next().ok_or_else(|| {
            Error::NotFound("Channel not found. Please check the ID or Handle.".to_string())
        })?;

        info!(channel_id = %channel.id, title = %channel.snippet.title, "channel resolved");
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel_json() -> serde_json::Value {
        json!({
            "kind": "youtube#channelListResponse",
            "items": [{
                "id": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
                "snippet": {
                    "title": "Google for Developers",
                    "description": "",
                    "customUrl": "@googledevelopers",
                    "publishedAt": "2007-08-23T00:34:43Z",
                    "thumbnails": {}
                },
                "statistics": {
                    "viewCount": "1000000",
                    "subscriberCount": "500000",
                    "hiddenSubscriberCount": false,
                    "videoCount": "42"
                },
                "contentDetails": { "relatedPlaylists": { "uploads": "UU_x5XG1OV2P6uZZ5FSM9Ttw" } }
            }]
        })
    }

    fn resolver(server: &MockServer) -> ChannelResolver {
        ChannelResolver::new(YouTubeClient::new(server.uri()))
    }

    #[test]
    fn at_prefixed_inputs_are_handles() {
        for input in ["@GoogleDevelopers", "@a", "@UCnotAnId", "  @spaced  "] {
            match ChannelLookup::parse(input).expect("valid input") {
                ChannelLookup::Handle(handle) => assert_eq!(handle, input.trim()),
                other => panic!("{input} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn uc_prefixed_inputs_are_ids_after_cleaning() {
        for input in [
            "UC_x5XG1OV2P6uZZ5FSM9Ttw",
            "https://www.youtube.com/UC_x5XG1OV2P6uZZ5FSM9Ttw/",
            "https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw",
            "youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw/videos",
        ] {
            assert_eq!(
                ChannelLookup::parse(input).expect("valid input"),
                ChannelLookup::Id("UC_x5XG1OV2P6uZZ5FSM9Ttw".to_string()),
                "input: {input}"
            );
        }
    }

    #[test]
    fn other_inputs_get_at_prepended() {
        for (input, expected) in [
            ("GoogleDevelopers", "@GoogleDevelopers"),
            ("https://www.youtube.com/GoogleDevelopers/", "@GoogleDevelopers"),
            ("uc_lowercase", "@uc_lowercase"),
        ] {
            assert_eq!(
                ChannelLookup::parse(input).expect("valid input"),
                ChannelLookup::Handle(expected.to_string())
            );
        }
    }

    #[test]
    fn handle_urls_are_not_double_prefixed() {
        assert_eq!(
            ChannelLookup::parse("https://www.youtube.com/@GoogleDevelopers/videos")
                .expect("valid input"),
            ChannelLookup::Handle("@GoogleDevelopers".to_string())
        );
    }

    #[test]
    fn rejects_empty_identifier() {
        assert!(ChannelLookup::parse("   ").is_err());
        assert!(ChannelLookup::parse("https://www.youtube.com/").is_err());
    }

    #[tokio::test]
    async fn handle_lookup_uses_for_handle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .and(query_param("forHandle", "@GoogleDevelopers"))
            .and(query_param("part", "snippet,contentDetails,statistics"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
            .expect(1)
            .mount(&server)
            .await;

        let channel = resolver(&server)
            .resolve("@GoogleDevelopers", "test-key")
            .await
            .expect("channel resolves");

        assert_eq!(channel.id, "UC_x5XG1OV2P6uZZ5FSM9Ttw");
        assert_eq!(channel.uploads_playlist_id(), "UU_x5XG1OV2P6uZZ5FSM9Ttw");
    }

    #[tokio::test]
    async fn id_lookup_uses_id_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .and(query_param("id", "UC_x5XG1OV2P6uZZ5FSM9Ttw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
            .expect(1)
            .mount(&server)
            .await;

        let channel = resolver(&server)
            .resolve("https://www.youtube.com/UC_x5XG1OV2P6uZZ5FSM9Ttw/", "test-key")
            .await
            .expect("channel resolves");

        assert_eq!(channel.snippet.title, "Google for Developers");
    }

    #[tokio::test]
    async fn empty_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
            .expect(0)
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve("@GoogleDevelopers", "")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn error_envelope_becomes_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid. Please pass a valid API key." }
            })))
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve("@GoogleDevelopers", "bad-key")
            .await
            .unwrap_err();

        match err {
            Error::Upstream(message) => {
                assert_eq!(message, "API key not valid. Please pass a valid API key.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "youtube#channelListResponse",
                "pageInfo": { "totalResults": 0, "resultsPerPage": 5 }
            })))
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve("@nobody-here", "test-key")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    }
}
