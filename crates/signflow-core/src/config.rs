//! Configuration module
//!
//! Server settings plus the connection parameters for the signature platform and
//! the object store. Connection parameters are kept as `Option` so an incomplete
//! deployment can be described and reported; [`crate::validation::check_configuration`]
//! resolves them into [`ConnectionSettings`].

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 3001;
const MAX_UPLOAD_SIZE_MB: usize = 25;
const STORAGE_TIMEOUT_SECS: u64 = 30;
const PLATFORM_TIMEOUT_SECS: u64 = 30;
const PLATFORM_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_DOCUMENT_NAME_PREFIX: &str = "PoC - ";

/// Region used when `S3_REGION` is not set.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

// Environment variable names of the required connection parameters. These are
// also the names reported back when a parameter is missing.
pub const ENV_PLATFORM_URL: &str = "DOCUMENSO_API_URL";
pub const ENV_PLATFORM_API_KEY: &str = "DOCUMENSO_API_KEY";
pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_S3_BUCKET: &str = "S3_BUCKET";
pub const ENV_S3_ACCESS_KEY: &str = "S3_ACCESS_KEY";
pub const ENV_S3_SECRET_KEY: &str = "S3_SECRET_KEY";
pub const ENV_S3_PUBLIC_URL: &str = "MINIO_PUBLIC_URL";

const REDACTED: &str = "[redacted]";

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub environment: String,
    pub json_logs: bool,
}

/// Signature platform settings as read from the environment
#[derive(Clone)]
pub struct PlatformSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Total deadline for one platform call
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Debug for PlatformSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PlatformSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Object storage settings as read from the environment
#[derive(Clone)]
pub struct StorageSettings {
    /// S3-compatible endpoint, e.g. "http://localhost:9000" for MinIO
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
    /// Base URL under which `{bucket}/{key}` is publicly reachable
    pub public_url: Option<String>,
    /// Deadline for one object write
    pub timeout: Duration,
}

impl Debug for StorageSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StorageSettings")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| REDACTED))
            .field("region", &self.region)
            .field("public_url", &self.public_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub platform: PlatformSettings,
    pub storage: StorageSettings,
    /// Prepended to the original filename to form the platform document name
    pub document_name_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let server = ServerConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            environment,
            json_logs: env::var("LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let platform = PlatformSettings {
            base_url: optional_var(ENV_PLATFORM_URL),
            api_key: optional_var(ENV_PLATFORM_API_KEY),
            timeout: Duration::from_secs(
                env::var("PLATFORM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| PLATFORM_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(PLATFORM_TIMEOUT_SECS),
            ),
            connect_timeout: Duration::from_secs(PLATFORM_CONNECT_TIMEOUT_SECS),
        };

        let storage = StorageSettings {
            endpoint: optional_var(ENV_S3_ENDPOINT),
            bucket: optional_var(ENV_S3_BUCKET),
            access_key: optional_var(ENV_S3_ACCESS_KEY),
            secret_key: optional_var(ENV_S3_SECRET_KEY),
            region: optional_var("S3_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            public_url: optional_var(ENV_S3_PUBLIC_URL),
            timeout: Duration::from_secs(
                env::var("STORAGE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| STORAGE_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(STORAGE_TIMEOUT_SECS),
            ),
        };

        Ok(Config {
            server,
            platform,
            storage,
            document_name_prefix: env::var("DOCUMENT_NAME_PREFIX")
                .unwrap_or_else(|_| DEFAULT_DOCUMENT_NAME_PREFIX.to_string()),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for Config {
    /// Defaults with every connection parameter unset.
    fn default() -> Self {
        Config {
            server: ServerConfig {
                port: SERVER_PORT,
                cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
                max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
                environment: "development".to_string(),
                json_logs: false,
            },
            platform: PlatformSettings {
                base_url: None,
                api_key: None,
                timeout: Duration::from_secs(PLATFORM_TIMEOUT_SECS),
                connect_timeout: Duration::from_secs(PLATFORM_CONNECT_TIMEOUT_SECS),
            },
            storage: StorageSettings {
                endpoint: None,
                bucket: None,
                access_key: None,
                secret_key: None,
                region: DEFAULT_S3_REGION.to_string(),
                public_url: None,
                timeout: Duration::from_secs(STORAGE_TIMEOUT_SECS),
            },
            document_name_prefix: DEFAULT_DOCUMENT_NAME_PREFIX.to_string(),
        }
    }
}

/// Blank values are treated the same as unset ones.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fully resolved platform connection
#[derive(Clone)]
pub struct PlatformConnection {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Debug for PlatformConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PlatformConnection")
            .field("base_url", &self.base_url)
            .field("api_key", &REDACTED)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved object storage connection
#[derive(Clone)]
pub struct StorageConnection {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
}

impl Debug for StorageConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StorageConnection")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_key", &REDACTED)
            .field("region", &self.region)
            .field("public_url", &self.public_url)
            .finish()
    }
}

/// Every connection parameter the pipeline needs, all present.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
    pub platform: PlatformConnection,
    pub storage: StorageConnection,
}
