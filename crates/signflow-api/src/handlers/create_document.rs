//! Document upload handler: turns the upload form into a signing session.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload_request;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CreateDocumentResponse {
    pub token: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = extract_upload_request(multipart?).await?;

    let session = state.signing.run(request).await?;

    tracing::info!(recipient_id = %session.recipient_id, "Signing token issued");

    Ok(Json(CreateDocumentResponse {
        token: session.token,
    }))
}
