//! Persisted login identity.
//!
//! The session lives under two keys of a [`StorageBackend`]: `user` holds a
//! JSON object `{"email": ...}` and `authToken` holds the raw bearer token.
//! Every storage failure is logged and swallowed: a broken state directory
//! degrades to "not logged in", it never takes the client down.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dbdeck_storage::StorageBackend;

/// Storage key of the display identity.
pub const USER_KEY: &str = "user";
/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// The logged-in identity.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    #[serde(skip)]
    pub token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Load/save/clear access to the persisted [`Session`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Persist `session`, replacing whatever was stored before.
    ///
    /// A session without a token removes any previously stored token.
    pub async fn save(&self, session: &Session) {
        match serde_json::to_vec(session) {
            Ok(user) => {
                if let Err(e) = self.backend.put(USER_KEY, &user).await {
                    warn!(error = %e, "failed to persist session identity");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode session identity"),
        }

        let result = match &session.token {
            Some(token) => self.backend.put(TOKEN_KEY, token.as_bytes()).await,
            None => self.backend.delete(TOKEN_KEY).await,
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist session token");
        }
        debug!(email = %session.email, "session saved");
    }

    /// The last saved session, or `None` if nothing usable is stored.
    pub async fn load(&self) -> Option<Session> {
        let raw = match self.backend.get(USER_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read session identity");
                return None;
            }
        };
        let mut session: Session = match serde_json::from_slice(&raw) {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "stored session identity is corrupt, ignoring");
                return None;
            }
        };
        session.token = self.token().await;
        Some(session)
    }

    /// The stored bearer token on its own, if any.
    pub async fn token(&self) -> Option<String> {
        match self.backend.get(TOKEN_KEY).await {
            Ok(Some(raw)) => match String::from_utf8(raw) {
                Ok(token) if !token.trim().is_empty() => Some(token.trim().to_owned()),
                Ok(_) => None,
                Err(e) => {
                    debug!(error = %e, "stored token is not UTF-8, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// Remove the identity and the token. Idempotent.
    pub async fn clear(&self) {
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.backend.delete(key).await {
                warn!(key, error = %e, "failed to clear session key");
            }
        }
        debug!("session cleared");
    }
}
