use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use popup_login_core::LoginResult;

/// Shown when the security token is missing, stale, or for someone else.
pub static FORBIDDEN_MESSAGE: &str = "Security check failed. Please refresh the page and try again.";

/// An error from the API. Every variant renders as a failure envelope, so the
/// browser only ever has one shape of response to parse.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Something went wrong which we should log but not expose to clients.
    Internal,

    /// The request's security token didn't check out. Nothing past the token
    /// check ran.
    Forbidden,

    /// Some handler-specific error
    Custom(StatusCode, String),
}

/// Return an error from a handler-specific error type.
#[macro_export]
macro_rules! bail {
    ($message:expr) => {
        return Err($crate::error::Error::custom($message))
    };
}

impl Error {
    /// Construct a custom error. These are requests our own browser code
    /// never sends, so they get a 400.
    pub fn custom(message: &str) -> Self {
        Self::Custom(StatusCode::BAD_REQUEST, message.to_string())
    }

    /// Unwrap a handler-specific error
    #[cfg(test)]
    pub fn unwrap_custom(self) -> (StatusCode, String) {
        match self {
            Self::Custom(status_code, message) => (status_code, message),
            other => panic!("called `Error::unwrap_custom` on {other:?}"),
        }
    }
}

#[expect(clippy::absolute_paths)]
impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!(?err, "JWT error");
        Self::Internal
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Internal => (StatusCode::OK, "Internal server error".to_string()),
            Self::Forbidden => (StatusCode::OK, FORBIDDEN_MESSAGE.to_string()),
            Self::Custom(status_code, message) => (status_code, message),
        };

        (status, Json(LoginResult::failure(message))).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::to_bytes;

    async fn body(err: Error) -> (StatusCode, LoginResult) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test_log::test(tokio::test)]
    async fn forbidden_is_a_failure_envelope() {
        assert_eq!(
            body(Error::Forbidden).await,
            (StatusCode::OK, LoginResult::failure(FORBIDDEN_MESSAGE))
        );
    }

    #[test_log::test(tokio::test)]
    async fn custom_keeps_status() {
        assert_eq!(
            body(Error::custom("Unknown action")).await,
            (StatusCode::BAD_REQUEST, LoginResult::failure("Unknown action"))
        );
    }
}
