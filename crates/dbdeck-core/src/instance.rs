//! Database instance records as the dashboard shows them.

use std::fmt;

use rand::Rng;
use serde::Serialize;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;

/// Client-generated instance identifier.
///
/// Seven random base-36 characters. Unique within one registry (the
/// registry redraws on collision), not across sessions or users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Draw a fresh random id.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..ID_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Lifecycle of an instance.
///
/// `Creating -> Running` is the only transition. The registry inserts
/// records only after the backend confirmed provisioning, so today every
/// record starts out `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Creating,
    Running,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => f.pad("creating"),
            Self::Running => f.pad("running"),
        }
    }
}

/// One provisioned database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    pub id: InstanceId,
    pub name: String,
    pub status: InstanceStatus,
    pub bolt_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
}

impl DatabaseInstance {
    /// Apply a provisioning confirmation. Returns `false` if the instance
    /// was already running.
    pub fn confirm_running(&mut self) -> bool {
        match self.status {
            InstanceStatus::Creating => {
                self.status = InstanceStatus::Running;
                true
            }
            InstanceStatus::Running => false,
        }
    }
}

/// Canonical database info as reported by `GET /db/my-database` or
/// `POST /db/create`.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub container_name: Option<String>,
    pub bolt_port: Option<u16>,
    pub http_port: Option<u16>,
    pub neo4j_password: Option<String>,
    pub message: String,
}

impl fmt::Debug for DatabaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseInfo")
            .field("container_name", &self.container_name)
            .field("bolt_port", &self.bolt_port)
            .field("http_port", &self.http_port)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
