//! Explicit registration for the things other parts of the server react to.
//! Everything is wired up once in `main` and handed to handlers through
//! `State`.

use popup_login_core::login;
use std::{collections::HashMap, fmt, sync::Arc};

/// A failed login, and where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginFailure<'a> {
    /// The username as submitted (after sanitizing)
    pub username: &'a str,

    /// The AJAX action being handled when it failed, if any.
    pub action: Option<&'a str>,
}

/// Something that wants to know about failed logins (auditing, lockouts.)
pub trait LoginFailedListener: Send + Sync {
    fn login_failed(&self, failure: &LoginFailure<'_>);
}

/// Handlers reachable through the AJAX endpoint's `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AjaxAction {
    Login,
}

/// The registry itself.
#[derive(Clone, Default)]
pub struct Hooks {
    /// Called, in order, for every failed login
    login_failed: Vec<Arc<dyn LoginFailedListener>>,

    /// AJAX action names and what they run
    ajax: HashMap<String, AjaxAction>,
}

impl Hooks {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The login handler under its usual name and its no-privilege alias.
    pub fn with_login(self) -> Self {
        self.on_ajax(login::ACTION, AjaxAction::Login)
            .on_ajax(&format!("nopriv_{}", login::ACTION), AjaxAction::Login)
    }

    /// Register a failed-login listener.
    #[must_use]
    pub fn on_login_failed(mut self, listener: Arc<dyn LoginFailedListener>) -> Self {
        self.login_failed.push(listener);
        self
    }

    /// Route an AJAX action name to a handler.
    #[must_use]
    pub fn on_ajax(mut self, name: &str, action: AjaxAction) -> Self {
        self.ajax.insert(name.to_string(), action);
        self
    }

    /// Tell every listener about a failed login.
    pub fn login_failed(&self, failure: &LoginFailure<'_>) {
        for listener in &self.login_failed {
            listener.login_failed(failure);
        }
    }

    /// Which handler an AJAX action name maps to.
    pub fn ajax_action(&self, name: &str) -> Option<AjaxAction> {
        self.ajax.get(name).copied()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("login_failed", &self.login_failed.len())
            .field("ajax", &self.ajax)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl LoginFailedListener for Recorder {
        fn login_failed(&self, failure: &LoginFailure<'_>) {
            self.0.lock().unwrap().push(failure.username.to_string());
        }
    }

    #[test]
    fn login_actions_are_registered() {
        let hooks = Hooks::new().with_login();

        assert_eq!(hooks.ajax_action("ajax_login"), Some(AjaxAction::Login));
        assert_eq!(hooks.ajax_action("nopriv_ajax_login"), Some(AjaxAction::Login));
        assert_eq!(hooks.ajax_action("heartbeat"), None);
    }

    #[test]
    fn every_listener_hears_about_failures() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let hooks = Hooks::new()
            .on_login_failed(first.clone())
            .on_login_failed(second.clone());

        hooks.login_failed(&LoginFailure {
            username: "alice",
            action: None,
        });

        assert_eq!(*first.0.lock().unwrap(), vec!["alice".to_string()]);
        assert_eq!(*second.0.lock().unwrap(), vec!["alice".to_string()]);
    }
}
