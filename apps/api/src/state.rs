use std::sync::Arc;

use crate::config::Config;
use crate::storage::FileStorage;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users, skills and resumes. Default: `PgStore`.
    pub store: Arc<dyn Store>,
    /// Where uploaded resume files are written.
    pub files: Arc<dyn FileStorage>,
    pub config: Config,
}
