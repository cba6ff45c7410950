//! Shared application state for the listing routes.

use crate::registry::MountedResources;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Descriptors validated at mount time, keyed by logical name.
    pub resources: Arc<MountedResources>,
}
