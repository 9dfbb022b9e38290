//! HTTP implementation of [`SignaturePlatform`].
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /api/v1/documents` `{document_path, name}` -> `{id}`
//! - `POST /api/v1/documents/{id}/recipients` `{name, email}` -> `{id}`
//! - `POST /api/v1/documents/{id}/send`
//! - `POST /api/v1/recipients/{id}/token` -> `{token}`

use crate::traits::{PlatformError, PlatformOperation, PlatformResult, SignaturePlatform};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use signflow_core::{DocumentId, PlatformConnection, RecipientId};
use std::fmt::{Debug, Formatter, Result as FmtResult};

const API_KEY_HEADER: &str = "X-API-KEY";

/// HTTP client for the e-signature platform
#[derive(Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Debug for PlatformClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Identifiers come back as numbers or strings depending on the platform version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: WireId,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

impl PlatformClient {
    pub fn new(connection: &PlatformConnection) -> PlatformResult<Self> {
        let client = Client::builder()
            .timeout(connection.timeout)
            .connect_timeout(connection.connect_timeout)
            .build()
            .map_err(|e| {
                PlatformError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: connection.base_url.trim_end_matches('/').to_string(),
            api_key: connection.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST to the platform and return the status and raw body of a successful response.
    async fn post(
        &self,
        operation: PlatformOperation,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> PlatformResult<(u16, String)> {
        let url = self.build_url(path);
        let mut request = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let start = std::time::Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                operation = %operation,
                url = %url,
                timeout = e.is_timeout(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Platform request received no response"
            );
            PlatformError::Unreachable {
                operation,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(
                error = %e,
                operation = %operation,
                status = status.as_u16(),
                "Failed to read platform response body"
            );
            PlatformError::Unreachable {
                operation,
                message: format!("Response body could not be read: {}", e),
            }
        })?;

        if !status.is_success() {
            tracing::error!(
                operation = %operation,
                status = status.as_u16(),
                body = %text,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Platform rejected request"
            );
            return Err(PlatformError::Rejected {
                operation,
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(
            operation = %operation,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Platform request succeeded"
        );

        Ok((status.as_u16(), text))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        operation: PlatformOperation,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> PlatformResult<T> {
        let (status, text) = self.post(operation, path, body).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                operation = %operation,
                status,
                body = %text,
                "Failed to parse platform response"
            );
            PlatformError::Rejected {
                operation,
                status,
                body: text,
            }
        })
    }
}

#[async_trait]
impl SignaturePlatform for PlatformClient {
    async fn create_document(&self, name: &str, source_url: &str) -> PlatformResult<DocumentId> {
        let response: IdResponse = self
            .post_json(
                PlatformOperation::CreateDocument,
                "/api/v1/documents",
                Some(json!({
                    "document_path": source_url,
                    "name": name,
                })),
            )
            .await?;

        Ok(DocumentId(response.id.into()))
    }

    async fn add_recipient(
        &self,
        document_id: &DocumentId,
        name: &str,
        email: &str,
    ) -> PlatformResult<RecipientId> {
        let path = format!(
            "/api/v1/documents/{}/recipients",
            urlencoding::encode(&document_id.0)
        );
        let response: IdResponse = self
            .post_json(
                PlatformOperation::AddRecipient,
                &path,
                Some(json!({
                    "name": name,
                    "email": email,
                })),
            )
            .await?;

        Ok(RecipientId(response.id.into()))
    }

    async fn send_for_signing(&self, document_id: &DocumentId) -> PlatformResult<()> {
        let path = format!(
            "/api/v1/documents/{}/send",
            urlencoding::encode(&document_id.0)
        );
        self.post(PlatformOperation::SendForSigning, &path, None)
            .await?;
        Ok(())
    }

    async fn mint_token(&self, recipient_id: &RecipientId) -> PlatformResult<String> {
        let path = format!(
            "/api/v1/recipients/{}/token",
            urlencoding::encode(&recipient_id.0)
        );
        let response: TokenResponse = self
            .post_json(PlatformOperation::MintToken, &path, None)
            .await?;

        Ok(response.token)
    }
}
