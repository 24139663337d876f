//! Route definitions for the `/measures` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use meterflow_core::measure::MAX_IMAGE_BYTES;

use crate::handlers::measures;
use crate::state::AppState;

/// Allowance on top of the image ceiling for the other form fields and
/// multipart framing.
const UPLOAD_BODY_SLACK: usize = 64 * 1024;

/// Routes mounted at `/measures`.
///
/// ```text
/// POST  /upload                  -> upload
/// PATCH /confirm                 -> confirm
/// GET   /{customer_code}/list    -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(measures::upload))
        .route("/confirm", patch(measures::confirm))
        .route("/{customer_code}/list", get(measures::list))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + UPLOAD_BODY_SLACK))
}
