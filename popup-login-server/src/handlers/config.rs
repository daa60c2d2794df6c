use crate::error::Error;
use crate::session::Session;
use crate::state::State;
use axum::{extract, Json};
use popup_login_core::{login, RuntimeConfig};

/// Hand the browser what it needs to intercept logins, including a token
/// bound to its session. Call once per page load.
#[tracing::instrument(skip_all)]
pub async fn handler(
    extract::State(state): extract::State<State>,
    Session(session): Session,
) -> Result<Json<RuntimeConfig>, Error> {
    let nonce = state.nonces().create(login::NONCE_ACTION, &session)?;

    Ok(Json(state.settings().runtime_config(nonce)))
}
