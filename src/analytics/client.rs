//! HTTP client for the conversation service's admin analytics endpoints.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::auth::ADMIN_KEY_HEADER;
use crate::domain::{ConversationSummary, Stage2Report};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Raw outcome of a single request, kept for endpoint probing.
#[derive(Debug, Clone)]
pub struct Probe {
    pub status: StatusCode,
    pub body: Value,
}

impl Probe {
    /// Human-readable reason carried by an error body.
    ///
    /// FastAPI services answer with `detail`, this crate's own API with `error`.
    pub fn detail(&self) -> String {
        self.body
            .get("detail")
            .or_else(|| self.body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            })
    }

    fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        if !self.status.is_success() {
            return Err(ClientError::Status {
                status: self.status.as_u16(),
                detail: self.detail(),
            });
        }
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Client for `/api/conversations` and the admin stage-2 endpoint.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    admin_key: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, admin_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_key: admin_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn admin_key(&self) -> Option<&str> {
        self.admin_key.as_deref()
    }

    /// List all conversations.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ClientError> {
        self.get("/api/conversations", None).await?.into_json()
    }

    /// Fetch stage-2 analytics with the configured admin key.
    pub async fn fetch_stage2(&self, conversation_id: &str) -> Result<Stage2Report, ClientError> {
        self.probe_stage2(conversation_id, self.admin_key())
            .await?
            .into_json()
    }

    /// Call the stage-2 endpoint with an arbitrary key (or none) and report what came back.
    pub async fn probe_stage2(
        &self,
        conversation_id: &str,
        admin_key: Option<&str>,
    ) -> Result<Probe, ClientError> {
        let path = format!("/api/admin/conversations/{}/stage2", conversation_id);
        self.get(&path, admin_key).await
    }

    async fn get(&self, path: &str, admin_key: Option<&str>) -> Result<Probe, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let connection = |source| ClientError::Connection {
            url: url.clone(),
            source,
        };

        let mut request = self.http.get(&url);
        if let Some(key) = admin_key {
            request = request.header(ADMIN_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(connection)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(connection)?;

        // Error pages are not always JSON; keep them as a bare string
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        tracing::debug!(url = %url, status = %status, "Admin API response");
        Ok(Probe { status, body })
    }
}
