//! Construction of the storage and platform clients

use crate::services::SigningService;
use crate::state::AppState;
use anyhow::{Context, Result};
use signflow_core::{Config, ConnectionSettings};
use signflow_platform::PlatformClient;
use signflow_storage::S3ArtifactStore;
use std::sync::Arc;

/// Build the application state from resolved connection settings.
pub fn initialize_services(config: Arc<Config>, connections: &ConnectionSettings) -> Result<Arc<AppState>> {
    let store = S3ArtifactStore::new(&connections.storage)
        .context("Failed to initialize object storage client")?;
    tracing::info!(
        endpoint = %connections.storage.endpoint,
        bucket = %store.bucket(),
        region = %connections.storage.region,
        "Object storage client initialized"
    );

    let platform = PlatformClient::new(&connections.platform)
        .context("Failed to initialize signature platform client")?;
    tracing::info!(
        base_url = %connections.platform.base_url,
        "Signature platform client initialized"
    );

    let signing = SigningService::new(config.clone(), Arc::new(store), Arc::new(platform));

    Ok(Arc::new(AppState { config, signing }))
}
