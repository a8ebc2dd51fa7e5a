//! Register, login and logout.
//!
//! Each call is single-shot: validated locally, then at most one request.
//! There is no retry and no deduplication of concurrent submissions; a
//! caller that must not double-submit disables its input while a call is
//! outstanding.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{AuthApi, Credentials};
use crate::error::GatewayError;
use crate::session::{Session, SessionStore};
use crate::validation::validate_credentials;

/// Successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub message: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginOutcome")
            .field("message", &self.message)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Successful registration. The user is not logged in by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub message: String,
}

/// Authentication front door: validates, calls the backend, records the
/// session on a successful login.
pub struct AuthGateway {
    api: Arc<dyn AuthApi>,
    session: SessionStore,
}

impl AuthGateway {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for blank fields or a malformed email
    ///   (nothing is sent).
    /// - [`GatewayError::Server`] for a non-2xx answer, carrying the server
    ///   message or `Register failed (<status>)`.
    /// - [`GatewayError::Network`] if no response was obtained.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RegisterOutcome, GatewayError> {
        validate_credentials(email, password)?;

        debug!(email, "registering account");
        let resp = self.api.register(&credentials(email, password)).await?;
        if !resp.is_success() {
            let status = resp.status;
            return Err(GatewayError::Server {
                status,
                message: resp.message_or(|| format!("Register failed ({status})")),
            });
        }

        info!(email, "account registered");
        Ok(RegisterOutcome {
            message: resp.message_or(|| "User registered successfully".to_owned()),
        })
    }

    /// Log in and persist the resulting session.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for blank fields or a malformed email
    ///   (nothing is sent).
    /// - [`GatewayError::Server`] for a non-2xx answer, carrying the server
    ///   message or `Invalid credentials`.
    /// - [`GatewayError::Network`] if no response was obtained.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, GatewayError> {
        validate_credentials(email, password)?;

        debug!(email, "logging in");
        let resp = self.api.login(&credentials(email, password)).await?;
        if !resp.is_success() {
            return Err(GatewayError::Server {
                status: resp.status,
                message: resp.message_or(|| "Invalid credentials".to_owned()),
            });
        }

        let token = resp.body.token.clone().filter(|t| !t.is_empty());
        self.session
            .save(&Session {
                email: email.to_owned(),
                token: token.clone(),
            })
            .await;

        info!(email, has_token = token.is_some(), "logged in");
        Ok(LoginOutcome {
            message: resp.message_or(|| "Login successful".to_owned()),
            token,
        })
    }

    /// Forget the local session. The backend has no logout endpoint.
    pub async fn logout(&self) -> String {
        self.session.clear().await;
        info!("logged out");
        "Logged out".to_owned()
    }

    /// The session store this gateway writes to.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dbdeck_storage::MemoryBackend;

    use super::*;
    use crate::api::{ApiResponse, ResponseBody};
    use crate::error::{TransportError, ValidationError};

    /// Canned backend that counts requests and remembers the last payload.
    struct FakeAuth {
        reply: Result<ApiResponse, String>,
        calls: AtomicUsize,
        last: Mutex<Option<Credentials>>,
    }

    impl FakeAuth {
        fn replying(status: u16, body: ResponseBody) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(ApiResponse { status, body }),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("connection refused".to_owned()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn answer(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(credentials.clone());
            self.reply
                .clone()
                .map_err(|reason| TransportError { reason })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AuthApi for FakeAuth {
        async fn register(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError> {
            self.answer(credentials)
        }

        async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError> {
            self.answer(credentials)
        }
    }

    fn gateway(api: &Arc<FakeAuth>) -> AuthGateway {
        let store = SessionStore::new(Arc::new(MemoryBackend::new()));
        AuthGateway::new(Arc::clone(api) as Arc<dyn AuthApi>, store)
    }

    fn body(message: Option<&str>, token: Option<&str>) -> ResponseBody {
        ResponseBody {
            message: message.map(str::to_owned),
            token: token.map(str::to_owned),
            ..ResponseBody::default()
        }
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_network() {
        let api = FakeAuth::replying(200, body(None, Some("t")));
        let gw = gateway(&api);
        for email in ["no-at-sign", "a@nodot", "a b@c.com"] {
            let err = gw.login(email, "pw").await.unwrap_err();
            assert!(matches!(
                err,
                GatewayError::Validation(ValidationError::InvalidEmail)
            ));
            let err = gw.register(email, "pw").await.unwrap_err();
            assert!(matches!(
                err,
                GatewayError::Validation(ValidationError::InvalidEmail)
            ));
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn empty_fields_never_reach_network() {
        let api = FakeAuth::replying(200, body(None, None));
        let gw = gateway(&api);
        for (email, password) in [("", "pw"), ("a@b.com", ""), ("", "")] {
            let err = gw.login(email, password).await.unwrap_err();
            assert_eq!(err.to_string(), "Please fill in all fields");
            let err = gw.register(email, password).await.unwrap_err();
            assert_eq!(err.to_string(), "Please fill in all fields");
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn login_success_persists_session() {
        let api = FakeAuth::replying(200, body(Some("welcome"), Some("abc")));
        let gw = gateway(&api);

        let outcome = gw.login("a@b.com", "pw").await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome {
                message: "welcome".to_owned(),
                token: Some("abc".to_owned()),
            }
        );

        let session = gw.session().load().await.unwrap();
        assert_eq!(session.email, "a@b.com");
        assert_eq!(gw.session().token().await.as_deref(), Some("abc"));
        assert_eq!(api.calls(), 1);

        let sent = api.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.email, "a@b.com");
        assert_eq!(sent.password, "pw");
    }

    #[tokio::test]
    async fn login_success_without_message_uses_default() {
        let api = FakeAuth::replying(200, body(None, Some("abc")));
        let outcome = gateway(&api).login("a@b.com", "pw").await.unwrap();
        assert_eq!(outcome.message, "Login successful");
    }

    #[tokio::test]
    async fn login_rejection_leaves_session_empty() {
        let api = FakeAuth::replying(401, ResponseBody::default());
        let gw = gateway(&api);
        let err = gw.login("a@b.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
        assert_eq!(gw.session().load().await, None);
    }

    #[tokio::test]
    async fn login_rejection_passes_server_message_through() {
        let api = FakeAuth::replying(403, body(Some("account locked"), None));
        let err = gateway(&api).login("a@b.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "account locked");
    }

    #[tokio::test]
    async fn register_failure_falls_back_to_status_message() {
        let api = FakeAuth::replying(409, ResponseBody::default());
        let err = gateway(&api).register("a@b.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Register failed (409)");
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let api = FakeAuth::replying(201, body(None, Some("ignored")));
        let gw = gateway(&api);
        let outcome = gw.register("a@b.com", "x").await.unwrap();
        assert_eq!(outcome.message, "User registered successfully");
        assert_eq!(gw.session().load().await, None);
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let api = FakeAuth::unreachable();
        let gw = gateway(&api);
        assert!(matches!(
            gw.login("a@b.com", "pw").await.unwrap_err(),
            GatewayError::Network
        ));
        assert!(matches!(
            gw.register("a@b.com", "pw").await.unwrap_err(),
            GatewayError::Network
        ));
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let api = FakeAuth::replying(200, body(None, Some("abc")));
        let gw = gateway(&api);
        gw.login("a@b.com", "pw").await.unwrap();
        assert_eq!(gw.logout().await, "Logged out");
        assert_eq!(gw.session().load().await, None);
        assert_eq!(gw.session().token().await, None);
    }
}
