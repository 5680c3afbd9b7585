use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    /// A credential the pipeline needs is missing.
    #[display("{_0}")]
    Configuration(String),

    /// The channel lookup matched nothing.
    #[display("{_0}")]
    NotFound(String),

    /// The provider answered with an explicit error envelope.
    #[display("{_0}")]
    Upstream(String),

    /// The model returned nothing usable.
    #[display("{_0}")]
    Generation(String),

    #[display("{_0}")]
    Custom(String),

    #[from]
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[from]
    #[display("Request failed: {_0}")]
    Http(reqwest::Error),

    #[from]
    #[display("Malformed JSON: {_0}")]
    Json(serde_json::Error),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }

    pub fn configuration(val: impl std::fmt::Display) -> Self {
        Self::Configuration(val.to_string())
    }

    pub fn upstream(val: impl std::fmt::Display) -> Self {
        Self::Upstream(val.to_string())
    }

    pub fn generation(val: impl std::fmt::Display) -> Self {
        Self::Generation(val.to_string())
    }

    /// Anything outside the named failure classes: transport, decoding, bad input.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Custom(_) | Self::Io(_) | Self::Http(_) | Self::Json(_)
        )
    }
}

impl From<&str> for Error {
    fn from(val: &str) -> Self {
        Self::Custom(val.to_string())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn displays_bare_message_for_named_classes() {
        let err = Error::upstream("API key not valid. Please pass a valid API key.");
        assert_eq!(
            err.to_string(),
            "API key not valid. Please pass a valid API key."
        );
        assert!(!err.is_unexpected());
    }

    #[test]
    fn decoding_failures_are_unexpected() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_unexpected());
        assert!(err.to_string().starts_with("Malformed JSON"));
    }
}
