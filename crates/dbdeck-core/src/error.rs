//! Error types for `dbdeck-core`.
//!
//! [`GatewayError`] is the whole taxonomy a caller has to handle for a
//! remote operation: rejected locally, rejected by the server, accepted with
//! an unusable body, or no response at all. Its `Display` output is the
//! message shown to the user.

/// Input rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Email or password left blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Email does not have a `local@domain.tld` shape.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Database password left blank.
    #[error("Please enter a password to create a database.")]
    MissingDatabasePassword,
}

/// Errors from remote operations (auth and provisioning).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Local validation failed; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The server reported success but the body lacks a required field.
    #[error("{message}")]
    InvalidResponse { message: String },

    /// No response could be obtained (DNS, refused, reset, timeout).
    #[error("Network or server error")]
    Network,
}

impl GatewayError {
    /// HTTP status of a server-reported failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of the transport itself, as reported by an [`api`](crate::api)
/// implementation.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl From<TransportError> for GatewayError {
    fn from(_: TransportError) -> Self {
        Self::Network
    }
}
