use reqwest::StatusCode;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Things that keep a login request from getting a `LoginResult` back. Any
/// of these counts as a transport failure: the server never answered in a way
/// we could read.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the configured AJAX URL was
    /// relative or empty.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The request never completed, or the body wasn't the JSON we expected.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than a 2xx.
    #[error("Network response was not ok ({0})")]
    Status(StatusCode),
}
