//! In-memory list of the user's database instances.
//!
//! The registry is a local projection: it is filled from successful
//! provisioning responses, emptied by local deletes, and forgotten when the
//! dashboard session ends. It is never reconciled with a backend listing.
//! Mutations take `&mut self`; share it across tasks only behind a lock.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiResponse, CreateDatabaseRequest, ProvisioningApi};
use crate::error::{GatewayError, ValidationError};
use crate::instance::{DatabaseInfo, DatabaseInstance, InstanceId, InstanceStatus};
use crate::session::SessionStore;

/// Host used for Neo4j Browser URLs unless configured otherwise.
pub const DEFAULT_BROWSER_HOST: &str = "localhost";

/// Result of a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub instance: DatabaseInstance,
    pub message: String,
}

/// Ordered, session-scoped collection of [`DatabaseInstance`]s.
pub struct InstanceRegistry {
    api: Arc<dyn ProvisioningApi>,
    session: SessionStore,
    instances: Vec<DatabaseInstance>,
    browser_host: String,
}

impl InstanceRegistry {
    pub fn new(api: Arc<dyn ProvisioningApi>, session: SessionStore) -> Self {
        Self {
            api,
            session,
            instances: Vec::new(),
            browser_host: DEFAULT_BROWSER_HOST.to_owned(),
        }
    }

    /// Override the host used by [`browser_url`](Self::browser_url).
    #[must_use]
    pub fn with_browser_host(mut self, host: impl Into<String>) -> Self {
        self.browser_host = host.into();
        self
    }

    /// Provision a database and record it.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `password` is empty (nothing sent).
    /// - [`GatewayError::Server`] for a non-2xx answer, carrying the server
    ///   message or `Create failed (<status>)`.
    /// - [`GatewayError::InvalidResponse`] if a 2xx body has no `boltPort`.
    /// - [`GatewayError::Network`] if no response was obtained.
    ///
    /// The registry is unchanged on every error path.
    pub async fn create(&mut self, password: &str) -> Result<CreateOutcome, GatewayError> {
        if password.is_empty() {
            return Err(ValidationError::MissingDatabasePassword.into());
        }

        let token = self.session.token().await;
        let request = CreateDatabaseRequest {
            neo4j_password: password.to_owned(),
        };
        debug!(authenticated = token.is_some(), "requesting database");
        let resp = self
            .api
            .create_database(&request, token.as_deref())
            .await?;
        let info = interpret(resp, "Create failed", "Neo4j database created")?;

        let Some(bolt_port) = info.bolt_port else {
            warn!("provisioning response is missing boltPort");
            return Err(GatewayError::InvalidResponse {
                message: "Create failed: response is missing boltPort".to_owned(),
            });
        };

        let id = self.fresh_id();
        let name = info
            .container_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("db-{id}"));
        let instance = DatabaseInstance {
            id,
            name,
            status: InstanceStatus::Running,
            bolt_port,
            http_port: info.http_port,
        };
        self.instances.push(instance.clone());

        info!(id = %instance.id, name = %instance.name, bolt_port, "database instance added");
        Ok(CreateOutcome {
            instance,
            message: info.message,
        })
    }

    /// Remove the instance with `id`. Returns the removed record, or `None`
    /// if no such instance exists. Local only; nothing is sent.
    pub fn delete(&mut self, id: &InstanceId) -> Option<DatabaseInstance> {
        let pos = self.instances.iter().position(|i| &i.id == id)?;
        let removed = self.instances.remove(pos);
        info!(id = %removed.id, name = %removed.name, "database instance removed");
        Some(removed)
    }

    /// All instances in insertion order.
    pub fn list(&self) -> &[DatabaseInstance] {
        &self.instances
    }

    pub fn get(&self, id: &InstanceId) -> Option<&DatabaseInstance> {
        self.instances.iter().find(|i| &i.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Fetch the canonical info of the user's database.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Server`] for a non-2xx answer, carrying the server
    ///   message or `Fetch failed (<status>)`.
    /// - [`GatewayError::Network`] if no response was obtained.
    pub async fn my_database(&self) -> Result<DatabaseInfo, GatewayError> {
        let token = self.session.token().await;
        let resp = self.api.my_database(token.as_deref()).await?;
        interpret(resp, "Fetch failed", "Database info")
    }

    /// HTTP port to open the Neo4j Browser on for instance `id`.
    ///
    /// A fresh lookup wins since ports can change after provisioning; the
    /// cached port of the instance is used only when that lookup fails or
    /// reports no port.
    pub async fn resolve_browser_target(&self, id: &InstanceId) -> Option<u16> {
        match self.my_database().await {
            Ok(DatabaseInfo {
                http_port: Some(port),
                ..
            }) => return Some(port),
            Ok(_) => debug!("database info has no httpPort, using cached port"),
            Err(e) => debug!(error = %e, "database info unavailable, using cached port"),
        }
        self.get(id).and_then(|i| i.http_port)
    }

    /// Neo4j Browser URL for an HTTP port.
    pub fn browser_url(&self, http_port: u16) -> String {
        format!("http://{}:{http_port}/browser", self.browser_host)
    }

    /// Bolt connection URI for a bolt port, on the same host as
    /// [`browser_url`](Self::browser_url).
    pub fn bolt_url(&self, bolt_port: u16) -> String {
        format!("bolt://{}:{bolt_port}", self.browser_host)
    }

    fn fresh_id(&self) -> InstanceId {
        loop {
            let id = InstanceId::random();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Map a provisioning response onto [`DatabaseInfo`] or a server error.
fn interpret(
    resp: ApiResponse,
    failure: &str,
    default_message: &str,
) -> Result<DatabaseInfo, GatewayError> {
    if !resp.is_success() {
        let status = resp.status;
        return Err(GatewayError::Server {
            status,
            message: resp.message_or(|| format!("{failure} ({status})")),
        });
    }
    let body = resp.body;
    Ok(DatabaseInfo {
        container_name: body.container_name,
        bolt_port: body.bolt_port,
        http_port: body.http_port,
        neo4j_password: body.neo4j_password,
        message: body.message.unwrap_or_else(|| default_message.to_owned()),
    })
}
