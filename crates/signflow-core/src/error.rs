//! Error types module
//!
//! All failures of a signing workflow are unified under [`AppError`]. The variants
//! follow the failure categories the HTTP boundary distinguishes: incomplete client
//! input, incomplete deployment configuration, object storage failures, platform
//! rejections (a response was received) and platform unreachability (no response).

use serde_json::Value;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Failure category of an [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Storage,
    Platform,
    Network,
    Unknown,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PLATFORM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Structured detail for the client, if any
    fn client_details(&self) -> Option<Value>;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing environment variables: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Platform rejected {operation} with status {status}: {body}")]
    Platform {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("No response from platform during {operation}: {message}")]
    Network {
        operation: &'static str,
        message: String,
    },

    #[error("Unexpected error: {0}")]
    Unknown(String),

    #[error("Unexpected error with source")]
    UnknownWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::UnknownWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Validation { .. } | AppError::InvalidRequest(_) => {
            (400, "VALIDATION_ERROR", false, LogLevel::Debug)
        }
        AppError::Configuration { .. } => (500, "CONFIGURATION_ERROR", false, LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Platform { .. } => (500, "PLATFORM_ERROR", false, LogLevel::Error),
        AppError::Network { .. } => (500, "NETWORK_ERROR", false, LogLevel::Error),
        AppError::Unknown(_) | AppError::UnknownWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, LogLevel::Error)
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } | AppError::InvalidRequest(_) => ErrorKind::Validation,
            AppError::Configuration { .. } => ErrorKind::Configuration,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Platform { .. } => ErrorKind::Platform,
            AppError::Network { .. } => ErrorKind::Network,
            AppError::Unknown(_) | AppError::UnknownWithSource { .. } => ErrorKind::Unknown,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation { missing } if missing.len() == 1 && missing[0] == "document" => {
                "Document file is required.".to_string()
            }
            AppError::Validation { missing } => {
                format!("Missing required fields: {}", missing.join(", "))
            }
            AppError::InvalidRequest(ref msg) => msg.clone(),
            AppError::Configuration { missing } => {
                format!("Missing environment variables: {}", missing.join(", "))
            }
            AppError::Storage(_) => "Failed to store the document.".to_string(),
            AppError::Platform { .. } => "An API error occurred.".to_string(),
            AppError::Network { .. } => {
                "The request was made but no response was received.".to_string()
            }
            AppError::Unknown(_) | AppError::UnknownWithSource { .. } => {
                "An unexpected error occurred.".to_string()
            }
        }
    }

    fn client_details(&self) -> Option<Value> {
        match self {
            AppError::Validation { missing } | AppError::Configuration { missing } => {
                Some(Value::from(missing.clone()))
            }
            AppError::InvalidRequest(_) => None,
            // Upstream payload is forwarded as JSON when it parses, raw otherwise
            AppError::Platform { body, .. } => {
                if body.trim().is_empty() {
                    None
                } else {
                    Some(
                        serde_json::from_str::<Value>(body)
                            .unwrap_or_else(|_| Value::String(body.clone())),
                    )
                }
            }
            AppError::Network { .. } => None,
            AppError::Storage(ref msg) | AppError::Unknown(ref msg) => {
                Some(Value::String(msg.clone()))
            }
            AppError::UnknownWithSource { ref message, .. } => {
                Some(Value::String(message.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::Validation {
            missing: vec!["signer1Email".to_string(), "signer2Name".to_string()],
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.client_message(),
            "Missing required fields: signer1Email, signer2Name"
        );
        assert_eq!(
            err.client_details(),
            Some(json!(["signer1Email", "signer2Name"]))
        );
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_missing_document_only_message() {
        let err = AppError::Validation {
            missing: vec!["document".to_string()],
        };
        assert_eq!(err.client_message(), "Document file is required.");
    }

    #[test]
    fn test_error_metadata_configuration() {
        let err = AppError::Configuration {
            missing: vec!["S3_BUCKET".to_string()],
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.client_message(), "Missing environment variables: S3_BUCKET");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_platform_details_json_body() {
        let err = AppError::Platform {
            operation: "create_document",
            status: 422,
            body: r#"{"message":"document_path is invalid"}"#.to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.kind(), ErrorKind::Platform);
        assert_eq!(err.client_message(), "An API error occurred.");
        assert_eq!(
            err.client_details(),
            Some(json!({"message": "document_path is invalid"}))
        );
    }

    #[test]
    fn test_platform_details_plain_body() {
        let err = AppError::Platform {
            operation: "send_for_signing",
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.client_details(), Some(json!("Bad Gateway")));

        let empty = AppError::Platform {
            operation: "send_for_signing",
            status: 500,
            body: "  ".to_string(),
        };
        assert_eq!(empty.client_details(), None);
    }

    #[test]
    fn test_network_error_has_no_details() {
        let err = AppError::Network {
            operation: "mint_token",
            message: "connection refused".to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "NETWORK_ERROR");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(
            err.client_message(),
            "The request was made but no response was received."
        );
        assert!(err.client_details().is_none());
    }

    #[test]
    fn test_storage_and_unknown_are_sensitive() {
        assert!(AppError::Storage("bucket missing".to_string()).is_sensitive());
        assert!(AppError::Unknown("boom".to_string()).is_sensitive());
        assert!(!AppError::Network {
            operation: "add_recipient",
            message: "timeout".to_string()
        }
        .is_sensitive());
    }

    #[test]
    fn test_from_anyhow_keeps_chain() {
        let err: AppError = anyhow::anyhow!("inner failure")
            .context("outer context")
            .into();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        let detailed = err.detailed_message();
        assert!(detailed.contains("Unexpected error with source"));
        assert!(detailed.contains("outer context"));
    }
}
