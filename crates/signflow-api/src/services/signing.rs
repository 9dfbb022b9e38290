//! Signing workflow: store the upload, register it on the signature platform,
//! attach both signers, send it out and mint the first signer's token.
//!
//! Every request runs as its own workflow instance. Stages run strictly in order,
//! except the two recipient registrations which run together and are joined in
//! slot order. The first failing stage ends the workflow; nothing that already
//! happened is undone.

use signflow_core::validation::validate_upload;
use signflow_core::{
    AppError, ArtifactReference, Config, DocumentId, ErrorKind, Recipient, RecipientSlot, Signer,
    SigningSession, UploadRequest, ValidatedUpload,
};
use signflow_platform::{PlatformError, PlatformOperation, PlatformResult, SignaturePlatform};
use signflow_storage::{ArtifactStore, StorageError};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

/// Position of a workflow instance in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Validating,
    StoringArtifact,
    CreatingDocument,
    RegisteringRecipients,
    Sending,
    MintingToken,
    Done,
    Failed(ErrorKind),
}

impl WorkflowStage {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStage::Validating => "validating",
            WorkflowStage::StoringArtifact => "storing_artifact",
            WorkflowStage::CreatingDocument => "creating_document",
            WorkflowStage::RegisteringRecipients => "registering_recipients",
            WorkflowStage::Sending => "sending",
            WorkflowStage::MintingToken => "minting_token",
            WorkflowStage::Done => "done",
            WorkflowStage::Failed(_) => "failed",
        }
    }
}

impl Display for WorkflowStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A workflow that ended in `Failed`, with the stage it failed in.
#[derive(Debug)]
pub struct WorkflowFailure {
    pub stage: WorkflowStage,
    pub error: AppError,
}

impl WorkflowFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

#[derive(Clone)]
pub struct SigningService {
    config: Arc<Config>,
    store: Arc<dyn ArtifactStore>,
    platform: Arc<dyn SignaturePlatform>,
}

impl SigningService {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn ArtifactStore>,
        platform: Arc<dyn SignaturePlatform>,
    ) -> Self {
        Self {
            config,
            store,
            platform,
        }
    }

    /// Run one workflow instance for an inbound upload.
    ///
    /// On success the session carries a token for signer1's recipient, whatever
    /// order the platform answered the two registrations in.
    pub async fn run(&self, request: UploadRequest) -> Result<SigningSession, WorkflowFailure> {
        let workflow_id = Uuid::new_v4();
        let span = tracing::info_span!("signing_workflow", %workflow_id);
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: UploadRequest) -> Result<SigningSession, WorkflowFailure> {
        enter(WorkflowStage::Validating);
        // Configuration is checked per request as well as at startup.
        let (upload, _connections) = validate_upload(request, &self.config)
            .map_err(|e| fail(WorkflowStage::Validating, e))?;

        enter(WorkflowStage::StoringArtifact);
        let artifact = self
            .store_artifact(&upload)
            .await
            .map_err(|e| fail(WorkflowStage::StoringArtifact, e))?;
        tracing::info!(
            stage = %WorkflowStage::StoringArtifact,
            bucket = %artifact.bucket,
            key = %artifact.key,
            "Document stored"
        );

        enter(WorkflowStage::CreatingDocument);
        let document_name = format!("{}{}", self.config.document_name_prefix, upload.file.filename);
        let document_id = self
            .within_deadline(
                PlatformOperation::CreateDocument,
                self.platform.create_document(&document_name, &artifact.url),
            )
            .await
            .map_err(|e| fail(WorkflowStage::CreatingDocument, e))?;
        tracing::info!(
            stage = %WorkflowStage::CreatingDocument,
            document_id = %document_id,
            document_name = %document_name,
            "Document created"
        );

        enter(WorkflowStage::RegisteringRecipients);
        let [(first_slot, first), (second_slot, second)] = upload.signers();
        let (first_result, second_result) = tokio::join!(
            self.register(&document_id, first_slot, first),
            self.register(&document_id, second_slot, second),
        );
        // Results are paired by slot, not by completion order. When both fail, slot 1 is reported.
        let (primary, secondary) = match (first_result, second_result) {
            (Ok(primary), Ok(secondary)) => (primary, secondary),
            (Err(error), _) | (_, Err(error)) => {
                return Err(fail(WorkflowStage::RegisteringRecipients, error));
            }
        };
        tracing::info!(
            stage = %WorkflowStage::RegisteringRecipients,
            document_id = %document_id,
            primary_recipient_id = %primary.id,
            secondary_recipient_id = %secondary.id,
            "Recipients registered"
        );

        enter(WorkflowStage::Sending);
        self.within_deadline(
            PlatformOperation::SendForSigning,
            self.platform.send_for_signing(&document_id),
        )
        .await
        .map_err(|e| fail(WorkflowStage::Sending, e))?;
        tracing::info!(
            stage = %WorkflowStage::Sending,
            document_id = %document_id,
            "Document sent for signing"
        );

        enter(WorkflowStage::MintingToken);
        let token = self
            .within_deadline(
                PlatformOperation::MintToken,
                self.platform.mint_token(&primary.id),
            )
            .await
            .map_err(|e| fail(WorkflowStage::MintingToken, e))?;

        tracing::info!(
            stage = %WorkflowStage::Done,
            document_id = %document_id,
            recipient_id = %primary.id,
            "Signing session ready"
        );

        Ok(SigningSession {
            token,
            recipient_id: primary.id,
        })
    }

    async fn store_artifact(&self, upload: &ValidatedUpload) -> Result<ArtifactReference, AppError> {
        let deadline = self.config.storage.timeout;
        let call = self.store.store(
            upload.file.data.clone(),
            &upload.file.content_type,
            upload.file.extension(),
        );

        match timeout(deadline, call).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(StorageError::Timeout(deadline).into()),
        }
    }

    async fn register(
        &self,
        document_id: &DocumentId,
        slot: RecipientSlot,
        signer: &Signer,
    ) -> Result<Recipient, AppError> {
        let id = self
            .within_deadline(
                PlatformOperation::AddRecipient,
                self.platform
                    .add_recipient(document_id, &signer.name, &signer.email),
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(slot = slot.number(), error = %e, "Recipient registration failed");
            })?;

        tracing::debug!(slot = slot.number(), recipient_id = %id, "Recipient registered");

        Ok(Recipient {
            slot,
            name: signer.name.clone(),
            email: signer.email.clone(),
            id,
        })
    }

    /// Bound a platform call by the configured deadline. An elapsed deadline is
    /// the same as no response at all.
    async fn within_deadline<T>(
        &self,
        operation: PlatformOperation,
        call: impl Future<Output = PlatformResult<T>>,
    ) -> Result<T, AppError> {
        let deadline = self.config.platform.timeout;
        match timeout(deadline, call).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(PlatformError::Unreachable {
                operation,
                message: format!("no response within {:?}", deadline),
            }
            .into()),
        }
    }
}

fn enter(stage: WorkflowStage) {
    tracing::debug!(stage = %stage, "Entering stage");
}

fn fail(stage: WorkflowStage, error: AppError) -> WorkflowFailure {
    let terminal = WorkflowStage::Failed(error.kind());
    match error.kind() {
        ErrorKind::Validation => {
            tracing::debug!(stage = %stage, outcome = %terminal, error = %error, "Workflow rejected");
        }
        _ => {
            tracing::error!(
                stage = %stage,
                outcome = %terminal,
                error = %error.detailed_message(),
                "Workflow failed"
            );
        }
    }
    WorkflowFailure { stage, error }
}
