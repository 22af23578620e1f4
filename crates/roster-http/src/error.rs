//! Client construction errors

/// Why an [`crate::HttpRosterService`] could not be built
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// Base URL is not an absolute http(s) URL that can take path segments
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be created
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
