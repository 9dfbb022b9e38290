//! Signflow Core Library
//!
//! This crate provides the configuration, error taxonomy, domain models and the
//! request/configuration guard shared by the storage, platform and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{
    Config, ConnectionSettings, PlatformConnection, PlatformSettings, ServerConfig,
    StorageConnection, StorageSettings,
};
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
pub use models::{
    ArtifactReference, DocumentFile, DocumentId, Recipient, RecipientId, RecipientSlot, Signer,
    SignerInput, SigningSession, UploadRequest, UploadedFile, ValidatedUpload,
};
