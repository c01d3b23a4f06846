//! Profile Image Handlers
//!
//! Two entry points for setting the authenticated user's profile image:
//! a direct multipart upload and a fetch-from-URL variant. Both follow the
//! same linear flow: validate, resolve a safe name, write, update the user
//! record, redirect to the profile page.

use axum::{
    extract::{Multipart, State},
    response::Redirect,
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;

use super::error::ProfileImageError;
use super::filename::{resolve_file_name, REMOTE_POLICY, UPLOAD_POLICY};
use super::{remote, sniff, storage};

/// Form body for the fetch-from-URL entry point.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ImageUrlForm {
    /// URL to fetch the profile image from. Absent means no-op.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Set the profile image from a direct multipart upload.
///
/// POST /api/profile/image/file
///
/// Expects a multipart form with a single `file` field. The stored
/// extension comes from content sniffing, never from the client filename.
#[utoipa::path(
    post,
    path = "/api/profile/image/file",
    tag = "profile",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Image stored, redirect to profile"),
        (status = 415, description = "Sniffed type is not an image"),
        (status = 500, description = "Missing or undetectable file content"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.id))]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<Redirect, ProfileImageError> {
    let mut file_data: Option<bytes::Bytes> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|_| ProfileImageError::IllegalFileType)?,
            );
        }
        // Client filename and content type are deliberately ignored
    }

    let file_data = file_data.ok_or(ProfileImageError::IllegalFileType)?;

    // Validate by sniffing actual content before touching disk or database
    let detected = sniff::detect_image(&file_data)?;

    let file_name = resolve_file_name(auth_user.id, &detected.extension, &UPLOAD_POLICY);
    state.store.write(&file_name, &file_data).await?;

    let relative_path = storage::relative_path(&file_name);
    db::update_profile_image(&state.db, auth_user.id, &relative_path)
        .await?
        .ok_or(ProfileImageError::UserNotFound)?;

    info!(
        mime = %detected.mime,
        path = %relative_path,
        size = file_data.len(),
        "Profile image uploaded"
    );

    Ok(redirect_to_profile(&state))
}

/// Set the profile image by fetching a remote URL.
///
/// POST /api/profile/image/url
///
/// The URL must pass the protocol and trusted-domain allow-lists before
/// any fetch happens. The response body is sniffed on its first chunk and
/// streamed to the destination file.
#[utoipa::path(
    post,
    path = "/api/profile/image/url",
    tag = "profile",
    request_body(content = ImageUrlForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Image stored (or no URL given), redirect to profile"),
        (status = 400, description = "INVALID_URL_PROTOCOL, INVALID_URL_DOMAIN, or FAILED_TO_UPLOAD_IMAGE"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, auth_user, form), fields(user_id = %auth_user.id))]
pub async fn fetch_profile_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Form(form): Form<ImageUrlForm>,
) -> Result<Redirect, ProfileImageError> {
    // Absent imageUrl is a no-op success
    let Some(image_url) = form.image_url else {
        return Ok(redirect_to_profile(&state));
    };

    let url = remote::validate_image_url(&image_url, &state.config.trusted_image_domains)?;

    let response = remote::fetch_image(&state.http, url).await?;

    // Sniff the first non-empty chunk before opening the destination file
    let (first_chunk, body) = remote::first_chunk(response.bytes_stream()).await?;
    let detected = sniff::detect_image(&first_chunk)?;

    let file_name = resolve_file_name(auth_user.id, &detected.extension, &REMOTE_POLICY);
    state.store.write_stream(&file_name, first_chunk, body).await?;

    let relative_path = storage::relative_path(&file_name);
    db::update_profile_image(&state.db, auth_user.id, &relative_path)
        .await?
        .ok_or(ProfileImageError::UserNotFound)?;

    info!(
        mime = %detected.mime,
        path = %relative_path,
        source = %image_url,
        "Profile image fetched from URL"
    );

    Ok(redirect_to_profile(&state))
}

/// Redirect target shared by both entry points.
fn redirect_to_profile(state: &AppState) -> Redirect {
    Redirect::to(&format!("{}/profile", state.config.base_path))
}
