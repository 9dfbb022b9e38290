//! Signature platform abstraction

use async_trait::async_trait;
use signflow_core::{AppError, DocumentId, RecipientId};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// The four platform calls of a signing workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformOperation {
    CreateDocument,
    AddRecipient,
    SendForSigning,
    MintToken,
}

impl PlatformOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformOperation::CreateDocument => "create_document",
            PlatformOperation::AddRecipient => "add_recipient",
            PlatformOperation::SendForSigning => "send_for_signing",
            PlatformOperation::MintToken => "mint_token",
        }
    }
}

impl Display for PlatformOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Platform operation errors
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A response was received but it was an error status or an undecodable body
    #[error("{operation} rejected with status {status}: {body}")]
    Rejected {
        operation: PlatformOperation,
        status: u16,
        body: String,
    },

    /// No response was received (connection failure, timeout)
    #[error("{operation} received no response: {message}")]
    Unreachable {
        operation: PlatformOperation,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// E-signature platform
///
/// Each method is exactly one authenticated call. Implementations must not retry.
#[async_trait]
pub trait SignaturePlatform: Send + Sync {
    /// Register a document whose content is fetched from `source_url`.
    async fn create_document(&self, name: &str, source_url: &str) -> PlatformResult<DocumentId>;

    /// Attach a recipient to a document.
    async fn add_recipient(
        &self,
        document_id: &DocumentId,
        name: &str,
        email: &str,
    ) -> PlatformResult<RecipientId>;

    /// Dispatch the document to its recipients.
    async fn send_for_signing(&self, document_id: &DocumentId) -> PlatformResult<()>;

    /// Mint a single-use signing token for a recipient.
    async fn mint_token(&self, recipient_id: &RecipientId) -> PlatformResult<String>;
}

impl From<PlatformError> for AppError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Rejected {
                operation,
                status,
                body,
            } => AppError::Platform {
                operation: operation.as_str(),
                status,
                body,
            },
            PlatformError::Unreachable { operation, message } => AppError::Network {
                operation: operation.as_str(),
                message,
            },
            PlatformError::ConfigError(msg) => AppError::Unknown(msg),
        }
    }
}
