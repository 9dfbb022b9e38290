//! Signflow API Library
//!
//! This crate provides the HTTP handlers, the signing workflow orchestrator and
//! application setup.

mod handlers;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{SigningService, WorkflowFailure, WorkflowStage};
pub use state::AppState;
