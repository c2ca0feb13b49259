use shared::error::RemoteError;
use thiserror::Error;

/// Failure of a remote product or category query. Every variant displays as
/// a plain message, which the dashboard shows verbatim.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(String),
}

impl SourceError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("invalid dashboard location {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
}
