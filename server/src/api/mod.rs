//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::{auth, config::Config, profile, profile::ImageStore};

/// OpenAPI documentation for the profile image API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Avatar Server API",
        description = "Profile image upload and storage backend"
    ),
    paths(
        crate::profile::handlers::upload_profile_image,
        crate::profile::handlers::fetch_profile_image,
    ),
    components(schemas(crate::profile::handlers::ImageUrlForm)),
    modifiers(&SecurityAddon),
    tags((name = "profile", description = "Profile image management"))
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// HTTP client for remote image fetches
    pub http: reqwest::Client,
    /// Profile image file store
    pub store: ImageStore,
}

impl AppState {
    /// Create new application state.
    ///
    /// Builds the shared HTTP client with the configured fetch timeout and
    /// roots the image store at the configured static directory.
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        let store = ImageStore::new(config.static_root.clone());

        Ok(Self {
            db,
            config: Arc::new(config),
            http,
            store,
        })
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_size = state.config.max_upload_size;

    // Profile image routes require authentication
    let protected_routes = Router::new()
        .nest("/api/profile", profile::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Machine-readable API description
        .route("/api-docs/openapi.json", get(openapi_spec))
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Body limit sized for image uploads (default axum limit is 2MB)
        .layer(DefaultBodyLimit::max(max_upload_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Serve the generated OpenAPI document.
async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    #[test]
    fn openapi_doc_covers_both_upload_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/profile/image/file"));
        assert!(doc.paths.paths.contains_key("/api/profile/image/url"));

        let components = doc.components.expect("components should be registered");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ImageUrlForm"));
    }

    #[tokio::test]
    async fn router_builds_with_auth_middleware() {
        let config = Config::default_for_test();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let state = AppState::new(pool, config).unwrap();

        // Layering the auth middleware must satisfy the router's service
        // bounds; no request is issued.
        let _router = create_router(state);
    }
}
