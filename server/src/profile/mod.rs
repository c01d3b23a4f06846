//! Profile Image Service
//!
//! Validation, safe naming, storage, and record update for user profile
//! images.

mod error;
mod filename;
pub mod handlers;
mod remote;
mod sniff;
pub mod storage;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use error::ProfileImageError;
pub use sniff::DetectedType;
pub use storage::ImageStore;

/// Create the profile image router.
///
/// Routes (auth required, applied by the caller):
/// - POST /image/file - Direct multipart upload
/// - POST /image/url - Fetch from a trusted remote URL
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image/file", post(handlers::upload_profile_image))
        .route("/image/url", post(handlers::fetch_profile_image))
}
