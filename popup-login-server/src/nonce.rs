use crate::error::Error;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// What a security token vouches for.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The action this token may be used for, e.g. `ajax-login-nonce`.
    pub action: String,

    /// The client session the token was issued to. Empty for visitors without
    /// a session cookie.
    pub session: String,

    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks security tokens. Tokens are signed, expire, and are
/// only good for one action in one session.
#[derive(Clone)]
pub struct Nonces {
    /// Key for signing new tokens.
    encoding_key: EncodingKey,

    /// Key for verifying existing tokens.
    decoding_key: DecodingKey,

    /// How long a token stays valid, in seconds.
    lifetime: i64,
}

impl Nonces {
    /// Set up tokens from a base64-encoded secret.
    pub fn from_base64_secret(secret: &str, lifetime: u32) -> Result<Self, errors::Error> {
        Ok(Self {
            encoding_key: EncodingKey::from_base64_secret(secret)?,
            decoding_key: DecodingKey::from_base64_secret(secret)?,
            lifetime: i64::from(lifetime),
        })
    }

    /// Issue a token for `action`, bound to `session`.
    pub fn create(&self, action: &str, session: &str) -> Result<String, errors::Error> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            action: action.to_string(),
            session: session.to_string(),
            iat: now,
            exp: now + self.lifetime,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Check a token presented for `action` from `session`.
    pub fn verify(&self, token: &str, action: &str, session: &str) -> Result<Claims, NonceError> {
        if token.is_empty() {
            return Err(NonceError::Missing);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|err| {
                tracing::trace!(?err, "error decoding security token");
                NonceError::Invalid
            })?
            .claims;

        if claims.action != action {
            return Err(NonceError::WrongAction);
        }

        if claims.session != session {
            return Err(NonceError::WrongSession);
        }

        Ok(claims)
    }
}

/// Why a token was turned down.
#[derive(Debug, PartialEq, Eq)]
pub enum NonceError {
    Missing,
    Invalid,
    WrongAction,
    WrongSession,
}

impl From<NonceError> for Error {
    fn from(err: NonceError) -> Self {
        tracing::debug!(?err, "rejected security token");
        Self::Forbidden
    }
}
