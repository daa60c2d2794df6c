use super::login;
use crate::bail;
use crate::error::Error;
use crate::form::AjaxForm;
use crate::hooks::AjaxAction;
use crate::session::Session;
use crate::state::State;
use axum::{extract, Json};
use popup_login_core::{login::field, LoginResult};

/// Route a post to whichever handler its `action` field names.
#[tracing::instrument(skip_all, fields(action = tracing::field::Empty))]
pub async fn handler(
    extract::State(state): extract::State<State>,
    Session(session): Session,
    form: AjaxForm,
) -> Result<Json<LoginResult>, Error> {
    let action = form.get(field::ACTION).unwrap_or_default();
    tracing::Span::current().record("action", action);

    match state.hooks().ajax_action(action) {
        Some(AjaxAction::Login) => Ok(Json(login::handler(&state, &session, &form).await?)),
        None => {
            tracing::debug!("no handler for action");
            bail!("Unknown action")
        }
    }
}
