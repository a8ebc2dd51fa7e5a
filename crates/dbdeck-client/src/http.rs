//! `reqwest` implementation of the backend API traits.

use dbdeck_core::api::{
    ApiResponse, AuthApi, CreateDatabaseRequest, Credentials, ProvisioningApi, ResponseBody,
};
use dbdeck_core::error::TransportError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::ClientConfig;

const USER_AGENT: &str = concat!("dbdeck/", env!("CARGO_PKG_VERSION"));

/// Errors building the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for `/auth/*` and `/db/*`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        let mut req = self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        debug!(method = "POST", path, "sending request");
        send(req).await
    }

    async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, TransportError> {
        let mut req = self.http.get(self.url(path));
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        debug!(method = "GET", path, "sending request");
        send(req).await
    }
}

async fn send(req: reqwest::RequestBuilder) -> Result<ApiResponse, TransportError> {
    let resp = req.send().await.map_err(|e| {
        debug!(error = %e, "request failed");
        TransportError {
            reason: e.to_string(),
        }
    })?;
    let status = resp.status().as_u16();

    // An unreadable body is treated like an empty one.
    let body = match resp.bytes().await {
        Ok(bytes) => ResponseBody::parse(&bytes),
        Err(e) => {
            debug!(status, error = %e, "failed to read response body");
            ResponseBody::default()
        }
    };
    debug!(status, "response received");
    Ok(ApiResponse { status, body })
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError> {
        self.post_json("/auth/register", credentials, None).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, TransportError> {
        self.post_json("/auth/login", credentials, None).await
    }
}

#[async_trait::async_trait]
impl ProvisioningApi for HttpApi {
    async fn create_database(
        &self,
        request: &CreateDatabaseRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        self.post_json("/db/create", request, token).await
    }

    async fn my_database(&self, token: Option<&str>) -> Result<ApiResponse, TransportError> {
        self.get("/db/my-database", token).await
    }
}
