//! Request and configuration guard
//!
//! Runs before any side-effecting call. Request completeness is checked first
//! (client-correctable), then deployment configuration (operator-correctable).
//! Each failure names every missing field or parameter of its category.

use crate::config::{
    Config, ConnectionSettings, PlatformConnection, StorageConnection, ENV_PLATFORM_API_KEY,
    ENV_PLATFORM_URL, ENV_S3_ACCESS_KEY, ENV_S3_BUCKET, ENV_S3_ENDPOINT, ENV_S3_PUBLIC_URL,
    ENV_S3_SECRET_KEY,
};
use crate::error::AppError;
use crate::models::{DocumentFile, Signer, SignerInput, UploadRequest, ValidatedUpload};

/// Multipart field names of the inbound request
pub const FIELD_DOCUMENT: &str = "document";
pub const FIELD_SIGNER1_NAME: &str = "signer1Name";
pub const FIELD_SIGNER1_EMAIL: &str = "signer1Email";
pub const FIELD_SIGNER2_NAME: &str = "signer2Name";
pub const FIELD_SIGNER2_EMAIL: &str = "signer2Email";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const DEFAULT_FILENAME: &str = "document";

/// Validate both the request and the configuration.
pub fn validate_upload(
    request: UploadRequest,
    config: &Config,
) -> Result<(ValidatedUpload, ConnectionSettings), AppError> {
    let upload = validate_request(request)?;
    let connections = check_configuration(config)?;
    Ok((upload, connections))
}

/// Confirm a non-empty file and both signer name/email pairs are present.
pub fn validate_request(request: UploadRequest) -> Result<ValidatedUpload, AppError> {
    let mut missing = Vec::new();

    let file = request.file.filter(|f| !f.data.is_empty());
    if file.is_none() {
        missing.push(FIELD_DOCUMENT.to_string());
    }

    let signer1 = resolve_signer(
        request.signer1,
        FIELD_SIGNER1_NAME,
        FIELD_SIGNER1_EMAIL,
        &mut missing,
    );
    let signer2 = resolve_signer(
        request.signer2,
        FIELD_SIGNER2_NAME,
        FIELD_SIGNER2_EMAIL,
        &mut missing,
    );

    match (file, signer1, signer2) {
        (Some(file), Some(signer1), Some(signer2)) if missing.is_empty() => Ok(ValidatedUpload {
            file: DocumentFile {
                data: file.data,
                content_type: non_blank(file.content_type)
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                filename: non_blank(file.filename)
                    .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            },
            signer1,
            signer2,
        }),
        _ => Err(AppError::Validation { missing }),
    }
}

/// Names of the required connection parameters that are not configured.
pub fn missing_configuration(config: &Config) -> Vec<&'static str> {
    let required = [
        (ENV_PLATFORM_URL, &config.platform.base_url),
        (ENV_PLATFORM_API_KEY, &config.platform.api_key),
        (ENV_S3_ENDPOINT, &config.storage.endpoint),
        (ENV_S3_BUCKET, &config.storage.bucket),
        (ENV_S3_ACCESS_KEY, &config.storage.access_key),
        (ENV_S3_SECRET_KEY, &config.storage.secret_key),
        (ENV_S3_PUBLIC_URL, &config.storage.public_url),
    ];

    required
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
}

/// Resolve the connection parameters, failing with every missing name.
pub fn check_configuration(config: &Config) -> Result<ConnectionSettings, AppError> {
    let missing = missing_configuration(config);
    if !missing.is_empty() {
        return Err(AppError::Configuration {
            missing: missing.into_iter().map(String::from).collect(),
        });
    }

    let value = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();

    Ok(ConnectionSettings {
        platform: PlatformConnection {
            base_url: value(&config.platform.base_url),
            api_key: value(&config.platform.api_key),
            timeout: config.platform.timeout,
            connect_timeout: config.platform.connect_timeout,
        },
        storage: StorageConnection {
            endpoint: value(&config.storage.endpoint),
            bucket: value(&config.storage.bucket),
            access_key: value(&config.storage.access_key),
            secret_key: value(&config.storage.secret_key),
            region: config.storage.region.clone(),
            public_url: value(&config.storage.public_url),
        },
    })
}

fn resolve_signer(
    input: SignerInput,
    name_field: &str,
    email_field: &str,
    missing: &mut Vec<String>,
) -> Option<Signer> {
    let name = non_blank(input.name);
    let email = non_blank(input.email);

    if name.is_none() {
        missing.push(name_field.to_string());
    }
    if email.is_none() {
        missing.push(email_field.to_string());
    }

    Some(Signer {
        name: name?,
        email: email?,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
