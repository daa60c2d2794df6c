use crate::hooks::Hooks;
use crate::identity::IdentityProvider;
use crate::nonce::Nonces;
use axum::extract::FromRef;
use popup_login_core::config::{RuntimeConfig, SubmitPolicy};
use std::{collections::BTreeSet, sync::Arc};

/// Shared state needed by requests.
#[derive(Clone, FromRef)]
pub struct State {
    /// Who checks credentials.
    identity: Arc<dyn IdentityProvider>,

    /// Issues and checks security tokens.
    nonces: Nonces,

    /// Failed-login listeners and AJAX actions.
    hooks: Arc<Hooks>,

    /// Everything configured at startup.
    settings: Arc<Settings>,
}

impl State {
    /// Create a new state.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        nonces: Nonces,
        hooks: Hooks,
        settings: Settings,
    ) -> Self {
        Self {
            identity,
            nonces,
            hooks: Arc::new(hooks),
            settings: Arc::new(settings),
        }
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn nonces(&self) -> &Nonces {
        &self.nonces
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Startup configuration handlers care about.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Public, absolute URL of the AJAX endpoint.
    pub ajax_url: String,

    /// Cookie that identifies a client session for token binding.
    pub session_cookie: String,

    /// Popups the browser should intercept.
    pub popup_ids: BTreeSet<u32>,

    /// How the browser treats double submits.
    pub submit_policy: SubmitPolicy,

    /// What the browser shows when a request fails in transit.
    pub transport_error_message: Option<String>,

    /// Replaces every identity-provider failure message when set.
    pub generic_failure_message: Option<String>,
}

impl Settings {
    /// Settings with defaults for everything but the AJAX URL.
    pub fn new(ajax_url: impl Into<String>) -> Self {
        let defaults = RuntimeConfig::new("", "");

        Self {
            ajax_url: ajax_url.into(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            popup_ids: defaults.popup_ids,
            submit_policy: defaults.submit_policy,
            transport_error_message: None,
            generic_failure_message: None,
        }
    }

    /// The browser's configuration, carrying a freshly issued token.
    pub fn runtime_config(&self, nonce: String) -> RuntimeConfig {
        RuntimeConfig {
            ajax_url: self.ajax_url.clone(),
            nonce,
            popup_ids: self.popup_ids.clone(),
            submit_policy: self.submit_policy,
            transport_error_message: self.transport_error_message.clone(),
        }
    }
}

/// Session cookie name unless configured otherwise.
pub const DEFAULT_SESSION_COOKIE: &str = "popup_login_session";
