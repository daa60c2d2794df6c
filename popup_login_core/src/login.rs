use serde::{Deserialize, Serialize};

/// The AJAX action name the login handler answers to.
pub const ACTION: &str = "ajax_login";

/// The action name security tokens for login are scoped to.
pub const NONCE_ACTION: &str = "ajax-login-nonce";

/// What the server says when credentials check out.
pub const SUCCESS_MESSAGE: &str = "Login successful. Redirecting...";

/// Where the AJAX endpoint lives unless configured otherwise.
pub const DEFAULT_PATH: &str = "/wp-admin/admin-ajax.php";

/// Form field names, as the login form posts them.
pub mod field {
    /// Which AJAX handler should run.
    pub const ACTION: &str = "action";

    /// Username (or email, depending on the identity provider.)
    pub const USERNAME: &str = "log";

    /// Plaintext password.
    pub const PASSWORD: &str = "pwd";

    /// "Remember me" checkbox. Only the exact value `"true"` turns it on.
    pub const REMEMBER_ME: &str = "rememberme";

    /// The security token issued at page load.
    pub const SECURITY: &str = "security";
}

/// A credentials submission. Built fresh for every submit and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Req {
    /// Who's logging in.
    pub username: String,

    /// Plaintext password.
    pub password: String,

    /// Whether the session should outlive the browser session.
    pub remember_me: bool,

    /// The security token issued at page load.
    pub security: String,
}

impl Req {
    /// Read a request out of posted form fields. When a field is repeated the
    /// last value wins, and missing fields are empty.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut req = Self::default();

        for (name, value) in fields {
            match name {
                field::USERNAME => req.username = value.to_string(),
                field::PASSWORD => req.password = value.to_string(),
                field::REMEMBER_ME => req.remember_me = value == "true",
                field::SECURITY => req.security = value.to_string(),
                _ => {}
            }
        }

        req
    }
}

/// The one and only answer to a `Req`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Envelope", into = "Envelope")]
pub enum LoginResult {
    /// Credentials were accepted and a session was established.
    Success {
        /// Human-readable confirmation.
        message: String,
    },

    /// Something went wrong. The message is HTML-escaped text.
    Failure {
        /// Human-readable explanation.
        message: String,
    },
}

impl LoginResult {
    /// The fixed success result.
    pub fn success() -> Self {
        Self::Success {
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    /// A failure with the given message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Did it work?
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The message, whichever way it went.
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message } => message,
        }
    }
}

/// `{ "success": bool, "data": { "message": string } }`
#[derive(Serialize, Deserialize)]
struct Envelope {
    /// Which variant this is.
    success: bool,

    /// Payload. Failures from some handlers omit it entirely.
    #[serde(default)]
    data: Data,
}

/// The inside of an `Envelope`.
#[derive(Serialize, Deserialize, Default)]
struct Data {
    /// Human-readable message.
    #[serde(default)]
    message: String,
}

impl From<Envelope> for LoginResult {
    fn from(envelope: Envelope) -> Self {
        let message = envelope.data.message;

        if envelope.success {
            Self::Success { message }
        } else {
            Self::Failure { message }
        }
    }
}

impl From<LoginResult> for Envelope {
    fn from(result: LoginResult) -> Self {
        let success = result.is_success();

        let (LoginResult::Success { message } | LoginResult::Failure { message }) = result;

        Self {
            success,
            data: Data { message },
        }
    }
}
