//! Test helpers: build the signing service and router over in-process doubles.
//!
//! Run from workspace root: `cargo test -p signflow-api`.

#![allow(dead_code)]

pub mod mocks;

use axum_test::TestServer;
use bytes::Bytes;
use mocks::{MockPlatform, RecordingStore, TEST_PUBLIC_URL};
use signflow_api::setup::routes;
use signflow_api::{AppState, SigningService};
use signflow_core::{Config, SignerInput, UploadRequest, UploadedFile};
use std::sync::Arc;
use std::time::Duration;

pub const SIGNER1_NAME: &str = "Alice Martin";
pub const SIGNER1_EMAIL: &str = "alice@example.com";
pub const SIGNER2_NAME: &str = "Bob Durand";
pub const SIGNER2_EMAIL: &str = "bob@example.com";

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF";

/// Per-call deadline used by tests, short enough to keep hung calls cheap.
pub const TEST_DEADLINE: Duration = Duration::from_millis(300);

/// Configuration with every connection parameter set.
pub fn test_config() -> Config {
    let mut config = unconfigured();
    config.platform.base_url = Some("http://documenso.test".to_string());
    config.platform.api_key = Some("test-api-key".to_string());
    config.storage.endpoint = Some("http://minio.test:9000".to_string());
    config.storage.bucket = Some(mocks::TEST_BUCKET.to_string());
    config.storage.access_key = Some("minio".to_string());
    config.storage.secret_key = Some("minio-secret".to_string());
    config.storage.public_url = Some(TEST_PUBLIC_URL.to_string());
    config
}

/// Configuration with no connection parameter set.
pub fn unconfigured() -> Config {
    let mut config = Config::default();
    config.platform.timeout = TEST_DEADLINE;
    config.storage.timeout = TEST_DEADLINE;
    config
}

/// A complete upload of `contract.pdf` for Alice then Bob.
pub fn valid_request() -> UploadRequest {
    UploadRequest {
        file: Some(UploadedFile {
            data: Bytes::from_static(PDF_BYTES),
            content_type: Some("application/pdf".to_string()),
            filename: Some("contract.pdf".to_string()),
        }),
        signer1: SignerInput {
            name: Some(SIGNER1_NAME.to_string()),
            email: Some(SIGNER1_EMAIL.to_string()),
        },
        signer2: SignerInput {
            name: Some(SIGNER2_NAME.to_string()),
            email: Some(SIGNER2_EMAIL.to_string()),
        },
    }
}

/// Signing service plus handles on its doubles.
pub struct TestWorkflow {
    pub service: SigningService,
    pub store: Arc<RecordingStore>,
    pub platform: Arc<MockPlatform>,
}

pub fn workflow(config: Config, store: RecordingStore, platform: MockPlatform) -> TestWorkflow {
    let store = Arc::new(store);
    let platform = Arc::new(platform);
    let service = SigningService::new(Arc::new(config), store.clone(), platform.clone());
    TestWorkflow {
        service,
        store,
        platform,
    }
}

/// HTTP test server over the full router.
pub fn test_server(config: Config, store: RecordingStore, platform: MockPlatform) -> TestApp {
    let config = Arc::new(config);
    let store = Arc::new(store);
    let platform = Arc::new(platform);
    let signing = SigningService::new(config.clone(), store.clone(), platform.clone());
    let state = Arc::new(AppState {
        config: config.clone(),
        signing,
    });

    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        store,
        platform,
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<RecordingStore>,
    pub platform: Arc<MockPlatform>,
}
