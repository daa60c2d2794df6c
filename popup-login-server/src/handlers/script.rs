use axum::{http::header::CONTENT_TYPE, response::IntoResponse};

/// Where the glue script lives.
pub const PATH: &str = "/static/popup-login.js";

/// Loads the wasm interceptor, fetches the runtime config, and forwards
/// popup-show events. Built into the binary; it never changes per request.
static SCRIPT: &str = include_str!("../../assets/popup-login.js");

#[tracing::instrument(level = "trace")]
pub async fn handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/javascript; charset=utf-8")], SCRIPT)
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::to_bytes;
    use popup_login_core::config;

    #[test_log::test(tokio::test)]
    async fn test_serves_script() {
        let resp = handler().await.into_response();

        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains(config::PATH));
        assert!(body.contains("elementor/popup/show"));
    }
}
