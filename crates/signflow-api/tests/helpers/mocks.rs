//! Recording test doubles for the artifact store and the signature platform.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use signflow_core::{ArtifactReference, DocumentId, RecipientId};
use signflow_platform::{PlatformError, PlatformOperation, PlatformResult, SignaturePlatform};
use signflow_storage::{ArtifactStore, S3ArtifactStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_BUCKET: &str = "documents";
pub const TEST_PUBLIC_URL: &str = "http://minio.test";

/// S3 artifact store over an in-memory object store, counting every write attempt.
pub struct RecordingStore {
    inner: S3ArtifactStore,
    attempts: AtomicUsize,
    stored: Mutex<Vec<ArtifactReference>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: S3ArtifactStore::with_store(
                Arc::new(InMemory::new()),
                TEST_BUCKET.to_string(),
                TEST_PUBLIC_URL.to_string(),
            ),
            attempts: AtomicUsize::new(0),
            stored: Mutex::new(Vec::new()),
            failure: None,
            delay: None,
        }
    }

    /// Every write fails with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Every write waits `delay` before doing anything.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<ArtifactReference> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for RecordingStore {
    async fn store(
        &self,
        data: Bytes,
        content_type: &str,
        extension: Option<&str>,
    ) -> StorageResult<ArtifactReference> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(StorageError::UploadFailed(message.clone()));
        }

        let reference = self.inner.store(data, content_type, extension).await?;
        self.stored.lock().unwrap().push(reference.clone());
        Ok(reference)
    }
}

/// How a mocked platform call misbehaves
#[derive(Debug, Clone)]
pub enum Failure {
    /// The platform answers with an error status
    Rejected { status: u16, body: String },
    /// The connection fails outright
    Unreachable,
    /// The platform never answers
    Hang,
}

impl Failure {
    pub fn rejected(status: u16, body: &str) -> Self {
        Failure::Rejected {
            status,
            body: body.to_string(),
        }
    }

    async fn apply<T>(&self, operation: PlatformOperation) -> PlatformResult<T> {
        match self {
            Failure::Rejected { status, body } => Err(PlatformError::Rejected {
                operation,
                status: *status,
                body: body.clone(),
            }),
            Failure::Unreachable => Err(PlatformError::Unreachable {
                operation,
                message: "connection refused".to_string(),
            }),
            Failure::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(PlatformError::Unreachable {
                    operation,
                    message: "hung call was not cancelled".to_string(),
                })
            }
        }
    }
}

/// A completed (or failed) platform call, recorded in completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    CreateDocument {
        name: String,
        source_url: String,
    },
    AddRecipient {
        document_id: DocumentId,
        name: String,
        email: String,
        assigned: Option<RecipientId>,
    },
    SendForSigning {
        document_id: DocumentId,
    },
    MintToken {
        recipient_id: RecipientId,
    },
}

impl PlatformCall {
    pub fn operation(&self) -> PlatformOperation {
        match self {
            PlatformCall::CreateDocument { .. } => PlatformOperation::CreateDocument,
            PlatformCall::AddRecipient { .. } => PlatformOperation::AddRecipient,
            PlatformCall::SendForSigning { .. } => PlatformOperation::SendForSigning,
            PlatformCall::MintToken { .. } => PlatformOperation::MintToken,
        }
    }
}

/// In-process signature platform.
///
/// Identifiers are handed out from counters at the moment a call completes, so a
/// delayed registration receives a later recipient id than one that finished first.
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    next_document: AtomicUsize,
    next_recipient: AtomicUsize,
    failures: Vec<(PlatformOperation, Failure)>,
    recipient_failures: Vec<(String, Failure)>,
    recipient_delays: Vec<(String, Duration)>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call of `operation` fails.
    pub fn failing(mut self, operation: PlatformOperation, failure: Failure) -> Self {
        self.failures.push((operation, failure));
        self
    }

    /// Registering the recipient with this email fails.
    pub fn failing_recipient(mut self, email: &str, failure: Failure) -> Self {
        self.recipient_failures.push((email.to_string(), failure));
        self
    }

    /// Registering the recipient with this email completes only after `delay`.
    pub fn delaying_recipient(mut self, email: &str, delay: Duration) -> Self {
        self.recipient_delays.push((email.to_string(), delay));
        self
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: PlatformOperation) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Recipient id the platform assigned to `email`, if its registration succeeded.
    pub fn recipient_id_for(&self, email: &str) -> Option<RecipientId> {
        self.calls().into_iter().find_map(|call| match call {
            PlatformCall::AddRecipient {
                email: e, assigned, ..
            } if e == email => assigned,
            _ => None,
        })
    }

    fn failure_for(&self, operation: PlatformOperation) -> Option<Failure> {
        self.failures
            .iter()
            .find(|(op, _)| *op == operation)
            .map(|(_, failure)| failure.clone())
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SignaturePlatform for MockPlatform {
    async fn create_document(&self, name: &str, source_url: &str) -> PlatformResult<DocumentId> {
        let result = match self.failure_for(PlatformOperation::CreateDocument) {
            Some(failure) => failure.apply(PlatformOperation::CreateDocument).await,
            None => {
                let n = self.next_document.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(DocumentId(format!("doc-{}", n)))
            }
        };
        self.record(PlatformCall::CreateDocument {
            name: name.to_string(),
            source_url: source_url.to_string(),
        });
        result
    }

    async fn add_recipient(
        &self,
        document_id: &DocumentId,
        name: &str,
        email: &str,
    ) -> PlatformResult<RecipientId> {
        if let Some((_, delay)) = self.recipient_delays.iter().find(|(e, _)| e == email) {
            tokio::time::sleep(*delay).await;
        }

        let failure = self
            .recipient_failures
            .iter()
            .find(|(e, _)| e == email)
            .map(|(_, failure)| failure.clone())
            .or_else(|| self.failure_for(PlatformOperation::AddRecipient));

        let result = match failure {
            Some(failure) => failure.apply(PlatformOperation::AddRecipient).await,
            None => {
                let n = self.next_recipient.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(RecipientId(format!("rcpt-{}", n)))
            }
        };
        self.record(PlatformCall::AddRecipient {
            document_id: document_id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            assigned: result.as_ref().ok().cloned(),
        });
        result
    }

    async fn send_for_signing(&self, document_id: &DocumentId) -> PlatformResult<()> {
        let result = match self.failure_for(PlatformOperation::SendForSigning) {
            Some(failure) => failure.apply(PlatformOperation::SendForSigning).await,
            None => Ok(()),
        };
        self.record(PlatformCall::SendForSigning {
            document_id: document_id.clone(),
        });
        result
    }

    async fn mint_token(&self, recipient_id: &RecipientId) -> PlatformResult<String> {
        let result = match self.failure_for(PlatformOperation::MintToken) {
            Some(failure) => failure.apply(PlatformOperation::MintToken).await,
            None => Ok(format!("token-for-{}", recipient_id)),
        };
        self.record(PlatformCall::MintToken {
            recipient_id: recipient_id.clone(),
        });
        result
    }
}
