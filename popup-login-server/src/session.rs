use crate::state::Settings;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{headers::Cookie, TypedHeader};
use std::{convert::Infallible, sync::Arc};

/// The client session a request belongs to, read from the session cookie.
/// Visitors without the cookie all share the empty session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    Arc<Settings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = Arc::<Settings>::from_ref(state);

        let session = parts
            .extract::<TypedHeader<Cookie>>()
            .await
            .ok()
            .and_then(|TypedHeader(cookie)| {
                cookie.get(&settings.session_cookie).map(str::to_string)
            })
            .unwrap_or_default();

        Ok(Self(session))
    }
}
