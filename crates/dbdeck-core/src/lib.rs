//! Core library for `dbdeck`.
//!
//! Holds the client-side state of the product: the persisted session, the
//! authentication gateway, the in-memory registry of database instances,
//! and the pure routing rules that decide which screen a location maps to.
//! Remote calls go through the [`api`] traits; the HTTP implementation
//! lives in `dbdeck-client`, so everything here is testable with fakes.

pub mod api;
pub mod auth;
pub mod error;
pub mod instance;
pub mod registry;
pub mod routing;
pub mod session;
pub mod validation;
