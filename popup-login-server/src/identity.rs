use argon2::{password_hash, Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::HashMap, fmt, io, path::Path};
use tokio::fs;

/// This should be the same for both missing accounts and incorrect passwords so
/// as not to give additional information about what accounts exist to someone
/// probing the system.
static BAD_LOGIN_MESSAGE: &str = "Error: Incorrect username or password.";

/// A request to check credentials and start a session.
#[derive(Clone)]
pub struct SignOn {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for SignOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignOn")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Who signed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
}

/// Why signing on didn't work. The message is meant for the user and may
/// contain HTML entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOnError {
    pub message: String,
}

impl SignOnError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Checks credentials and establishes sessions. Everything about how accounts
/// are stored and how sessions work lives behind this.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_on(&self, req: &SignOn) -> Result<Account, SignOnError>;
}

/// Accounts read from a TOML file at startup:
///
/// ```toml
/// [[accounts]]
/// username = "alice"
/// password_hash = "$argon2id$v=19$..."
/// ```
///
/// Hashes come from the `hash-password` binary.
#[derive(Debug, Default)]
pub struct Accounts {
    /// Argon2 PHC strings by username
    hashes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    username: String,
    password_hash: String,
}

/// Problems loading the accounts file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read accounts file: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse accounts file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("bad password hash for {username}: {err}")]
    Hash {
        username: String,
        err: password_hash::Error,
    },
}

impl Accounts {
    /// Read accounts from a file.
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path).await?;

        Self::from_toml(&source)
    }

    /// Read accounts from TOML source. Every hash is checked here so a typo
    /// shows up at startup instead of at someone's first login.
    pub fn from_toml(source: &str) -> Result<Self, LoadError> {
        let file: AccountsFile = toml::from_str(source)?;

        let mut hashes = HashMap::with_capacity(file.accounts.len());

        for entry in file.accounts {
            if let Err(err) = PasswordHash::new(&entry.password_hash) {
                return Err(LoadError::Hash {
                    username: entry.username,
                    err,
                });
            }

            hashes.insert(entry.username, entry.password_hash);
        }

        Ok(Self { hashes })
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for Accounts {
    #[tracing::instrument(skip(self))]
    async fn sign_on(&self, req: &SignOn) -> Result<Account, SignOnError> {
        if req.username.is_empty() {
            return Err(SignOnError::new("Error: The username field is empty."));
        }

        if req.password.is_empty() {
            return Err(SignOnError::new("Error: The password field is empty."));
        }

        let stored = self
            .hashes
            .get(&req.username)
            .ok_or(SignOnError::new(BAD_LOGIN_MESSAGE))?;

        let hash = PasswordHash::new(stored).map_err(|err| {
            tracing::error!(?err, "stored password hash is unreadable");
            SignOnError::new(BAD_LOGIN_MESSAGE)
        })?;

        if let Err(err) = Argon2::default().verify_password(req.password.as_bytes(), &hash) {
            if err != password_hash::Error::Password {
                tracing::error!(?err, "error verifying password");
            }

            return Err(SignOnError::new(BAD_LOGIN_MESSAGE));
        }

        tracing::debug!(remember = req.remember, "signed on");

        Ok(Account {
            username: req.username.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handlers::test::hash;

    fn accounts() -> Accounts {
        Accounts::from_toml(&format!(
            "[[accounts]]\nusername = \"alice\"\npassword_hash = \"{}\"\n",
            hash("letmein")
        ))
        .unwrap()
    }

    fn sign_on(username: &str, password: &str) -> SignOn {
        SignOn {
            username: username.to_string(),
            password: password.to_string(),
            remember: false,
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_success() {
        assert_eq!(
            accounts().sign_on(&sign_on("alice", "letmein")).await,
            Ok(Account {
                username: "alice".to_string()
            })
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let accounts = accounts();

        let wrong_password = accounts.sign_on(&sign_on("alice", "nope")).await;
        let unknown_user = accounts.sign_on(&sign_on("mallory", "letmein")).await;

        assert_eq!(wrong_password, Err(SignOnError::new(BAD_LOGIN_MESSAGE)));
        assert_eq!(wrong_password, unknown_user);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_fields() {
        let accounts = accounts();

        assert_eq!(
            accounts.sign_on(&sign_on("", "letmein")).await,
            Err(SignOnError::new("Error: The username field is empty."))
        );
        assert_eq!(
            accounts.sign_on(&sign_on("alice", "")).await,
            Err(SignOnError::new("Error: The password field is empty."))
        );
    }

    #[test]
    fn test_bad_hash_fails_at_load() {
        let err = Accounts::from_toml(
            "[[accounts]]\nusername = \"alice\"\npassword_hash = \"plaintext\"\n",
        )
        .unwrap_err();

        assert!(matches!(err, LoadError::Hash { username, .. } if username == "alice"));
    }

    #[test]
    fn test_empty_file() {
        assert!(Accounts::from_toml("").unwrap().is_empty());
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", sign_on("alice", "letmein")).contains("letmein"));
    }
}
