use std::sync::Arc;

use meterflow_vision::ValueExtractor;

use crate::config::ServerConfig;
use crate::files::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: meterflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Recognition-backed value extractor.
    pub extractor: Arc<ValueExtractor>,
    /// Local image store backing `/files`.
    pub files: Arc<FileStore>,
}
