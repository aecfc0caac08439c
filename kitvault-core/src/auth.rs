//! Admin access control.
//!
//! Two static-secret checks guard admin actions: an access key that unlocks
//! the admin entry point, and a password exchanged for a session. Neither is
//! cryptographically strong authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{LocalKind, LocalStorage};

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub started_at: DateTime<Utc>,
}

/// Errors that can occur during admin authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No admin password is configured, so nobody can log in.
    NotConfigured,
    /// The credential did not match.
    InvalidCredential,
    /// An admin action was attempted without a session.
    NotAuthenticated,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotConfigured => write!(
                f,
                "Admin login not configured. Set admin.password in config."
            ),
            AuthError::InvalidCredential => write!(f, "Invalid password"),
            AuthError::NotAuthenticated => write!(
                f,
                "Admin session required. Run 'kitvault admin login' first."
            ),
        }
    }
}

impl std::error::Error for AuthError {}

/// Exchanges a credential for a session.
pub trait Authenticator {
    fn authenticate(&self, credential: &str) -> Result<Session, AuthError>;
}

/// Accepts a single configured password.
#[derive(Debug, Clone)]
pub struct SharedSecretAuthenticator {
    secret: Option<String>,
}

impl SharedSecretAuthenticator {
    /// A blank secret disables login.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn authenticate(&self, credential: &str) -> Result<Session, AuthError> {
        let secret = self.secret.as_deref().ok_or(AuthError::NotConfigured)?;
        if credential != secret {
            return Err(AuthError::InvalidCredential);
        }
        Ok(Session {
            started_at: Utc::now(),
        })
    }
}

/// Checks the access key carried by an admin entry request.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    key: Option<String>,
}

impl AccessGate {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }

    /// True when `key` matches. With no key configured nothing matches.
    pub fn validate(&self, key: Option<&str>) -> bool {
        match (&self.key, key) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        }
    }
}

/// Admin entry gate plus a persisted session.
#[derive(Debug)]
pub struct AdminGate<A = SharedSecretAuthenticator> {
    authenticator: A,
    access: AccessGate,
    storage: Option<LocalStorage>,
    session: Option<Session>,
}

impl<A: Authenticator> AdminGate<A> {
    /// Creates a gate, resuming any session found in `storage`.
    pub fn new(authenticator: A, access: AccessGate, storage: Option<LocalStorage>) -> Self {
        let session = storage
            .as_ref()
            .and_then(|s| s.load_lenient::<Session>(LocalKind::AdminSession));
        Self {
            authenticator,
            access,
            storage,
            session,
        }
    }

    pub fn access(&self) -> &AccessGate {
        &self.access
    }

    pub fn validate_access_key(&self, key: Option<&str>) -> bool {
        self.access.validate(key)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the session, or [`AuthError::NotAuthenticated`].
    pub fn require(&self) -> Result<&Session, AuthError> {
        self.session.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    pub fn login(&mut self, credential: &str) -> Result<&Session, AuthError> {
        let session = self.authenticator.authenticate(credential)?;
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(LocalKind::AdminSession, &session) {
                tracing::warn!("Failed to save admin session: {}", e);
            }
        }
        tracing::info!("Admin session started");
        Ok(self.session.insert(session))
    }

    pub fn logout(&mut self) {
        self.session = None;
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove(LocalKind::AdminSession) {
                tracing::warn!("Failed to clear admin session: {}", e);
            }
        }
    }
}
