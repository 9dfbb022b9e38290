//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use signflow_core::validation::check_configuration;
use signflow_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.server.json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on missing connection parameters
    let connections = check_configuration(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.server.environment,
        "Configuration loaded and validated successfully"
    );

    let config = Arc::new(config);
    let state = services::initialize_services(config.clone(), &connections)?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
