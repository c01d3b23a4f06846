//! Authentication Middleware

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::api::AppState;
use crate::db::{find_user_by_id, User};

use super::error::AuthError;
use super::jwt::validate_access_token;

/// Authenticated user injected into request extensions.
///
/// This is a minimal struct containing only safe-to-expose user data.
/// Use this in handlers to access the current user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
        }
    }
}

/// Extract the access token from the request.
///
/// Checks the `Authorization: Bearer` header first, then falls back to a
/// `token` cookie for browser-originated form posts.
fn extract_token(request: &Request) -> Result<String, AuthError> {
    if let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return auth_header
            .strip_prefix("Bearer ")
            .map(ToString::to_string)
            .ok_or(AuthError::InvalidAuthHeader);
    }

    let jar = CookieJar::from_headers(request.headers());
    jar.get("token")
        .map(|c| c.value().to_string())
        .ok_or(AuthError::MissingCredential)
}

/// Middleware to require authentication.
///
/// Extracts the access token, validates the JWT, loads the user from the
/// database, and injects `AuthUser` into request extensions. Rejected
/// requests are logged with the client address before any file or record
/// mutation can happen.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Pull everything out of the request before awaiting: holding a
    // borrow of the (!Sync) body across an await would make this future
    // unusable as a middleware service.
    let token = extract_token(&request);
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |ci| ci.0.to_string());

    let result = match token {
        Ok(token) => authenticate(&state, &token).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(remote_addr = %remote, error = %e, "Blocked unauthenticated request");
            Err(e)
        }
    }
}

/// Resolve an access token to an `AuthUser`.
async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AuthError> {
    let claims = validate_access_token(token, &state.config.jwt_secret)?;

    let user_id: Uuid = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let user = find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(AuthUser::from(user))
}

/// Extractor for authenticated user in handlers.
///
/// Use this to get the current user in protected endpoints:
///
/// ```ignore
/// async fn protected_handler(auth_user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth_user.username)
/// }
/// ```
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::header::COOKIE;

    use super::*;

    fn request_with_headers(headers: &[(axum::http::HeaderName, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_token_from_authorization_header() {
        let request = request_with_headers(&[(AUTHORIZATION, "Bearer abc123")]);
        assert_eq!(extract_token(&request).unwrap(), "abc123");
    }

    #[test]
    fn falls_back_to_token_cookie() {
        let request = request_with_headers(&[(COOKIE, "token=xyz789; other=1")]);
        assert_eq!(extract_token(&request).unwrap(), "xyz789");
    }

    #[test]
    fn rejects_malformed_authorization_header() {
        let request = request_with_headers(&[(AUTHORIZATION, "Basic abc123")]);
        assert!(matches!(
            extract_token(&request),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn rejects_request_without_credential() {
        let request = request_with_headers(&[]);
        assert!(matches!(
            extract_token(&request),
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn extractor_reads_auth_user_from_extensions() {
        let user = AuthUser {
            id: Uuid::now_v7(),
            username: "test".into(),
            display_name: "Test".into(),
        };

        let mut request = request_with_headers(&[]);
        request.extensions_mut().insert(user.clone());
        let (mut parts, _) = request.into_parts();

        let extracted = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.id, user.id);
    }

    #[tokio::test]
    async fn extractor_rejects_when_middleware_did_not_run() {
        let (mut parts, _) = request_with_headers(&[]).into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));
    }
}
