//! Domain models for one signing workflow.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// File part of an inbound upload, exactly as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

/// Name/email pair of a signer, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct SignerInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Inbound request: a file plus two signing parties. Any part may be absent.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    pub signer1: SignerInput,
    pub signer2: SignerInput,
}

/// Document file that passed validation.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub data: Bytes,
    pub content_type: String,
    pub filename: String,
}

impl DocumentFile {
    /// Extension of the original filename, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub name: String,
    pub email: String,
}

/// Request that passed the validation guard: every field is present.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub file: DocumentFile,
    pub signer1: Signer,
    pub signer2: Signer,
}

impl ValidatedUpload {
    /// Signers paired with their slot, in input order.
    pub fn signers(&self) -> [(RecipientSlot, &Signer); 2] {
        [
            (RecipientSlot::First, &self.signer1),
            (RecipientSlot::Second, &self.signer2),
        ]
    }
}

/// Object written to storage for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReference {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub url: String,
}

/// Document identifier assigned by the signature platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

/// Recipient identifier assigned by the signature platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub String);

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl Display for RecipientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Input position of a signer. The first slot is the primary recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientSlot {
    First,
    Second,
}

impl RecipientSlot {
    pub fn number(self) -> u8 {
        match self {
            RecipientSlot::First => 1,
            RecipientSlot::Second => 2,
        }
    }

    pub fn is_primary(self) -> bool {
        self == RecipientSlot::First
    }
}

impl Display for RecipientSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.number())
    }
}

/// Recipient registered on a platform document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub slot: RecipientSlot,
    pub name: String,
    pub email: String,
    pub id: RecipientId,
}

/// Single-use signing token issued for the primary recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSession {
    pub token: String,
    pub recipient_id: RecipientId,
}
