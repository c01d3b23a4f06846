//! Profile Image Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors that can occur while setting a profile image.
#[derive(Debug, Error)]
pub enum ProfileImageError {
    /// Uploaded bytes are missing or their type cannot be determined.
    #[error("Illegal file type")]
    IllegalFileType,

    /// Content sniffing identified a non-image type.
    #[error("Profile image upload does not accept this file type: {mime}")]
    UnsupportedImageType {
        /// The detected MIME type.
        mime: String,
    },

    /// The image URL could not be parsed.
    #[error("Invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// URL scheme outside the http/https allow-list.
    #[error("URL protocol is not allowed: {scheme}")]
    InvalidUrlProtocol {
        /// The rejected scheme.
        scheme: String,
    },

    /// URL host outside the trusted-domain allow-list.
    #[error("URL domain is not trusted: {host}")]
    InvalidUrlDomain {
        /// The rejected host.
        host: String,
    },

    /// Remote fetch failed (network error, non-success status, empty body).
    #[error("Failed to retrieve image: {0}")]
    FetchFailed(String),

    /// Writing a direct upload to the static directory failed.
    #[error("Failed to store image")]
    WriteFailed(#[from] std::io::Error),

    /// Writing a fetched image stream to the static directory failed.
    /// Kept separate from `WriteFailed`: URL-mode storage failures report
    /// as a fetch-style 400, direct uploads as a server-side 500.
    #[error("Failed to store fetched image: {0}")]
    RemoteWriteFailed(std::io::Error),

    /// No user row exists for the authenticated ID.
    #[error("User not found")]
    UserNotFound,

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl From<reqwest::Error> for ProfileImageError {
    fn from(e: reqwest::Error) -> Self {
        Self::FetchFailed(e.to_string())
    }
}

impl IntoResponse for ProfileImageError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::IllegalFileType => (StatusCode::INTERNAL_SERVER_ERROR, "ILLEGAL_FILE_TYPE"),
            Self::UnsupportedImageType { .. } => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_IMAGE_TYPE")
            }
            Self::InvalidUrl(_) | Self::FetchFailed(_) | Self::RemoteWriteFailed(_) => {
                (StatusCode::BAD_REQUEST, "FAILED_TO_UPLOAD_IMAGE")
            }
            Self::InvalidUrlProtocol { .. } => (StatusCode::BAD_REQUEST, "INVALID_URL_PROTOCOL"),
            Self::InvalidUrlDomain { .. } => (StatusCode::BAD_REQUEST, "INVALID_URL_DOMAIN"),
            Self::WriteFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(serde_json::json!({
            "error": code,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_validation_errors_to_expected_statuses() {
        assert_eq!(
            ProfileImageError::IllegalFileType.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProfileImageError::UnsupportedImageType {
                mime: "application/pdf".into()
            }
            .into_response()
            .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ProfileImageError::InvalidUrlProtocol {
                scheme: "ftp".into()
            }
            .into_response()
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProfileImageError::InvalidUrlDomain {
                host: "evil.com".into()
            }
            .into_response()
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProfileImageError::FetchFailed("boom".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn write_failure_status_depends_on_entry_point() {
        let io_err = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

        // Direct upload: server-side storage error
        assert_eq!(
            ProfileImageError::WriteFailed(io_err())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // URL mode: reported like any failed remote upload
        assert_eq!(
            ProfileImageError::RemoteWriteFailed(io_err())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
