//! Seams to the remote backend.
//!
//! Implementations report what the server said (status plus decoded body)
//! or that no response was obtained. Interpreting a status as success or
//! failure, and picking fallback messages, is the job of the gateway and the
//! registry, so the transport stays a thin wrapper.

use serde::Serialize;
use serde_json::Value;

use crate::error::TransportError;

/// Login or registration credentials, sent as `{email, password}`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /db/create`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    pub neo4j_password: String,
}

impl std::fmt::Debug for CreateDatabaseRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateDatabaseRequest").finish_non_exhaustive()
    }
}

/// Union of every field the client reads from a response body.
///
/// All fields are optional. A body that is missing, empty, or not a JSON
/// object decodes to `ResponseBody::default()`, and each field is read on its
/// own: a field of the wrong type is dropped without losing the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody {
    pub message: Option<String>,
    pub token: Option<String>,
    pub container_name: Option<String>,
    pub bolt_port: Option<u16>,
    pub http_port: Option<u16>,
    pub neo4j_password: Option<String>,
}

impl ResponseBody {
    /// Decode a raw body leniently.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(raw) else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_owned);
        let port = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|p| u16::try_from(p).ok())
        };
        Self {
            message: text("message"),
            token: text("token"),
            container_name: text("containerName"),
            bolt_port: port("boltPort"),
            http_port: port("httpPort"),
            neo4j_password: text("neo4jPassword"),
        }
    }
}

/// A response the server actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server's message, or `fallback` if it sent none.
    #[must_use]
    pub fn message_or(&self, fallback: impl FnOnce() -> String) -> String {
        self.body.message.clone().unwrap_or_else(fallback)
    }
}

/// `POST /auth/register` and `POST /auth/login`.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was obtained.
    async fn register(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError>;

    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was obtained.
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError>;
}

/// `POST /db/create` and `GET /db/my-database`.
///
/// `token` is attached as `Authorization: Bearer <token>` when present and
/// omitted otherwise; no call is blocked locally for lack of a token.
#[async_trait::async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was obtained.
    async fn create_database(
        &self,
        request: &CreateDatabaseRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, TransportError>;

    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was obtained.
    async fn my_database(&self, token: Option<&str>) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_camel_case_fields() {
        let body = ResponseBody::parse(
            br#"{"containerName":"db-7","boltPort":7687,"httpPort":7474,"message":"ok","extra":1}"#,
        );
        assert_eq!(body.container_name.as_deref(), Some("db-7"));
        assert_eq!(body.bolt_port, Some(7687));
        assert_eq!(body.http_port, Some(7474));
        assert_eq!(body.message.as_deref(), Some("ok"));
    }

    #[test]
    fn parse_non_json_is_empty_body() {
        assert_eq!(ResponseBody::parse(b"<html>502</html>"), ResponseBody::default());
        assert_eq!(ResponseBody::parse(b""), ResponseBody::default());
    }

    #[test]
    fn parse_keeps_message_when_another_field_is_mistyped() {
        let body = ResponseBody::parse(br#"{"message":"quota exceeded","httpPort":"7474"}"#);
        assert_eq!(body.message.as_deref(), Some("quota exceeded"));
        assert_eq!(body.http_port, None);
    }

    #[test]
    fn parse_drops_out_of_range_port_only() {
        let body = ResponseBody::parse(br#"{"boltPort":7687,"httpPort":70000,"token":42}"#);
        assert_eq!(body.bolt_port, Some(7687));
        assert_eq!(body.http_port, None);
        assert_eq!(body.token, None);
    }

    #[test]
    fn parse_non_object_json_is_empty_body() {
        assert_eq!(ResponseBody::parse(b"[1,2]"), ResponseBody::default());
        assert_eq!(ResponseBody::parse(br#""ok""#), ResponseBody::default());
    }

    #[test]
    fn create_request_uses_wire_field_name() {
        let req = CreateDatabaseRequest {
            neo4j_password: "secret".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "neo4jPassword": "secret" })
        );
    }

    #[test]
    fn message_or_prefers_server_message() {
        let resp = ApiResponse {
            status: 500,
            body: ResponseBody::default(),
        };
        assert_eq!(resp.message_or(|| "fallback".to_owned()), "fallback");
        assert!(!resp.is_success());
    }
}
