use crate::hooks::{LoginFailedListener, LoginFailure};
use popup_login_core::login;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

/// Keeps count of failed logins made through the login action, per username.
/// Failures from anywhere else are none of our business and are ignored.
#[derive(Debug, Default)]
pub struct FailedLogins {
    /// Failures so far, by username
    counts: Mutex<HashMap<String, u32>>,
}

impl FailedLogins {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times this username has failed to log in.
    pub fn attempts(&self, username: &str) -> u32 {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .copied()
            .unwrap_or_default()
    }
}

impl LoginFailedListener for FailedLogins {
    fn login_failed(&self, failure: &LoginFailure<'_>) {
        if failure.action != Some(login::ACTION) {
            return;
        }

        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let attempts = counts.entry(failure.username.to_string()).or_default();
        *attempts = attempts.saturating_add(1);

        tracing::warn!(username = failure.username, attempts = *attempts, "failed login");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_failures_from_the_login_action() {
        let audit = FailedLogins::new();

        for _ in 0..3 {
            audit.login_failed(&LoginFailure {
                username: "alice",
                action: Some("ajax_login"),
            });
        }

        assert_eq!(audit.attempts("alice"), 3);
        assert_eq!(audit.attempts("bob"), 0);
    }

    #[test]
    fn ignores_failures_from_elsewhere() {
        let audit = FailedLogins::new();

        audit.login_failed(&LoginFailure {
            username: "alice",
            action: None,
        });
        audit.login_failed(&LoginFailure {
            username: "alice",
            action: Some("some_other_plugin"),
        });

        assert_eq!(audit.attempts("alice"), 0);
    }
}
