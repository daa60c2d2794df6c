use crate::hooks::Hooks;
use crate::identity::{Account, IdentityProvider, SignOn, SignOnError};
use crate::nonce::Nonces;
use crate::state::{Settings, State};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use async_trait::async_trait;
use popup_login_core::login;
use std::sync::{Arc, Mutex};

/// base64 of "a test secret, not for production"
pub const SECRET: &str = "YSB0ZXN0IHNlY3JldCwgbm90IGZvciBwcm9kdWN0aW9u";

/// Where tests pretend the AJAX endpoint lives
pub const AJAX_URL: &str = "http://localhost:3000/wp-admin/admin-ajax.php";

/// An identity provider that answers the same way every time and remembers
/// what it was asked.
pub struct MockProvider {
    answer: Result<Account, SignOnError>,
    calls: Mutex<Vec<SignOn>>,
}

impl MockProvider {
    /// Accept any credentials
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(Account {
                username: "alice".to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Reject any credentials with this message
    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(SignOnError::new(message)),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every sign-on so far
    pub fn calls(&self) -> Vec<SignOn> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn sign_on(&self, req: &SignOn) -> Result<Account, SignOnError> {
        self.calls.lock().unwrap().push(req.clone());
        self.answer.clone()
    }
}

/// Token issuer/checker with the test secret
pub fn nonces() -> Nonces {
    Nonces::from_base64_secret(SECRET, 3600).unwrap()
}

/// A token good for logging in from `session`
pub fn token(session: &str) -> String {
    nonces().create(login::NONCE_ACTION, session).unwrap()
}

/// State around a provider, with the login action registered
pub fn state(provider: Arc<MockProvider>) -> State {
    state_with(provider, Hooks::new().with_login(), Settings::new(AJAX_URL))
}

/// State with specific hooks and settings
pub fn state_with(provider: Arc<MockProvider>, hooks: Hooks, settings: Settings) -> State {
    State::new(provider, nonces(), hooks, settings)
}

/// Hash a password the way the accounts file expects
pub fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("failed to hash password")
        .to_string()
}
