use crate::error::Error;
use crate::form::AjaxForm;
use crate::hooks::LoginFailure;
use crate::identity::SignOn;
use crate::sanitize;
use crate::state::State;
use popup_login_core::{html, login, LoginResult};

/// Check the security token, then hand the credentials to the identity
/// provider. A rejected token means the provider is never asked; a rejected
/// login is still a normal (200) response with a failure envelope.
///
/// `session` is a cookie value and stays out of the span.
#[tracing::instrument(skip_all)]
pub async fn handler(state: &State, session: &str, form: &AjaxForm) -> Result<LoginResult, Error> {
    let req = login::Req::from_fields(form.pairs());

    state
        .nonces()
        .verify(&req.security, login::NONCE_ACTION, session)?;

    let sign_on = SignOn {
        username: sanitize::username(&req.username),
        password: sanitize::password(&req.password),
        remember: req.remember_me,
    };

    match state.identity().sign_on(&sign_on).await {
        Ok(account) => {
            tracing::info!(username = %account.username, "logged in");

            Ok(LoginResult::success())
        }

        Err(err) => {
            state.hooks().login_failed(&LoginFailure {
                username: &sign_on.username,
                action: Some(login::ACTION),
            });

            let message = state
                .settings()
                .generic_failure_message
                .clone()
                .unwrap_or(err.message);

            Ok(LoginResult::failure(html::escape(&html::decode_entities(
                &message,
            ))))
        }
    }
}
