use std::sync::Arc;

use crate::config::Config;
use crate::coordinator::ProfileCoordinator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ProfileCoordinator>,
    pub config: Config,
}
