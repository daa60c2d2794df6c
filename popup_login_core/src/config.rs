use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where the runtime config endpoint lives.
pub const PATH: &str = "/api/v1/login-config";

/// Popups the interceptor watches when nobody says otherwise.
pub const DEFAULT_POPUP_IDS: [u32; 2] = [1734, 1723];

/// Everything the browser needs to intercept popup logins. Issued per page
/// load, since it carries a fresh security token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Full URL of the AJAX endpoint.
    #[serde(rename = "ajaxurl")]
    pub ajax_url: String,

    /// Security token for the login action.
    pub nonce: String,

    /// Which popups get their login forms intercepted.
    #[serde(default = "default_popup_ids")]
    pub popup_ids: BTreeSet<u32>,

    /// What to do when the user submits again before the last request came
    /// back.
    #[serde(default)]
    pub submit_policy: SubmitPolicy,

    /// Shown in the popup when the request fails at the transport level. When
    /// unset those failures only go to the developer console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_error_message: Option<String>,
}

impl RuntimeConfig {
    /// A config watching the default popups with default policies.
    pub fn new(ajax_url: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            ajax_url: ajax_url.into(),
            nonce: nonce.into(),
            popup_ids: default_popup_ids(),
            submit_policy: SubmitPolicy::default(),
            transport_error_message: None,
        }
    }

    /// Is this popup one we care about?
    pub fn watches(&self, popup_id: u32) -> bool {
        self.popup_ids.contains(&popup_id)
    }
}

/// `serde` wants a function for non-`Default` defaults.
fn default_popup_ids() -> BTreeSet<u32> {
    DEFAULT_POPUP_IDS.into_iter().collect()
}

/// How to treat a submit while an earlier one from the same form is still in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Send every submit as its own request.
    #[default]
    Concurrent,

    /// Ignore submits until the outstanding request resolves, and disable the
    /// submit control meanwhile.
    SingleFlight,
}
