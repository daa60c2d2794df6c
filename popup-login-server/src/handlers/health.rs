/// Where the health check lives.
pub const PATH: &str = "/health";

#[tracing::instrument(level = "trace")]
pub async fn handler() -> &'static str {
    "OK"
}
