//! HTTP client for the `dbdeck` backend.
//!
//! [`HttpApi`] implements the `dbdeck-core` API traits over `reqwest`. It
//! is deliberately thin: one request per call, no retries, no status
//! interpretation. A body that fails to decode is passed on as an empty
//! object and the gateway applies its fallback messages.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dbdeck_client::{ClientConfig, HttpApi};
//! use dbdeck_core::auth::AuthGateway;
//! use dbdeck_core::session::SessionStore;
//! use dbdeck_storage::MemoryBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpApi::new(&ClientConfig::from_env())?);
//! let session = SessionStore::new(Arc::new(MemoryBackend::new()));
//! let auth = AuthGateway::new(api, session);
//! let outcome = auth.login("ada@example.com", "hunter2").await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::ClientConfig;
pub use http::{ClientError, HttpApi};
