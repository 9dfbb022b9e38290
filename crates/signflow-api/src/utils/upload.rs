//! Multipart parsing for the document upload form

use axum::extract::Multipart;
use signflow_core::validation::{
    FIELD_DOCUMENT, FIELD_SIGNER1_EMAIL, FIELD_SIGNER1_NAME, FIELD_SIGNER2_EMAIL,
    FIELD_SIGNER2_NAME,
};
use signflow_core::{AppError, UploadRequest, UploadedFile};

/// Collect the document and signer fields of the upload form.
///
/// Completeness is not checked here; absent fields stay `None` and are reported
/// by the validation guard. Unknown fields are skipped. Only one field named
/// "document" is accepted.
pub async fn extract_upload_request(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FIELD_DOCUMENT => {
                if request.file.is_some() {
                    return Err(AppError::InvalidRequest(
                        "Multiple document fields are not allowed; send exactly one field named 'document'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().map(|s: &str| s.to_string());
                let content_type = field.content_type().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?;

                request.file = Some(UploadedFile {
                    data,
                    content_type,
                    filename,
                });
            }
            FIELD_SIGNER1_NAME => request.signer1.name = Some(read_text(field).await?),
            FIELD_SIGNER1_EMAIL => request.signer1.email = Some(read_text(field).await?),
            FIELD_SIGNER2_NAME => request.signer2.name = Some(read_text(field).await?),
            FIELD_SIGNER2_EMAIL => request.signer2.email = Some(read_text(field).await?),
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(request)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to read form field: {}", e)))
}
