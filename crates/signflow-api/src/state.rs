//! Application state shared by all handlers.

use crate::services::SigningService;
use signflow_core::Config;
use std::sync::Arc;

/// Immutable per-process handles; each request builds its own workflow instance.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signing: SigningService,
}
