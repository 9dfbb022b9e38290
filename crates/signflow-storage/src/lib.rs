//! Signflow Storage Library
//!
//! Writes uploaded documents to S3-compatible object storage and hands back a
//! publicly resolvable [`ArtifactReference`](signflow_core::ArtifactReference).
//!
//! # Key format
//!
//! Keys are 64 hex characters drawn from a cryptographically strong source,
//! followed by the sanitized original extension: `{hex}.{ext}`, or the bare hex
//! string when the upload has no extension. Key generation lives in the `keys`
//! module.
//!
//! # URL format
//!
//! Objects are addressed path-style: `{public_base_url}/{bucket}/{key}`.

pub(crate) mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use s3::S3ArtifactStore;
pub use traits::{ArtifactStore, StorageError, StorageResult};
