use thiserror::Error;

/// Failures when talking to the Google Sheets and Docs APIs.
#[derive(Error, Debug)]
pub enum GoogleError {
    /// Refreshing the OAuth2 access token failed.
    #[error("Failed to refresh Google access token: {0}")]
    Token(String),

    /// HTTP request to a Google API failed.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// API URL could not be built.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Google API returned a non-success status.
    #[error("Google API responded with {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body for diagnostics
        body: String,
    },

    /// A data source is used without being configured.
    #[error("Google data source '{0}' is not configured")]
    NotConfigured(&'static str),
}
