pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use common::storage::filesystem::FilesystemMediaStore;
use common::storage::s3::S3MediaStore;
use common::storage::{MediaStore, StorageError};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, CorsConfig, StorageBackend};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tutordesk API",
        version = "1.0.0",
        description = "API for managing tutoring classes, materials, attendance and fees"
    ),
    tags(
        (name = "Users", description = "Registration, login and accounts"),
        (name = "Classes", description = "Class CRUD for teachers and class lists for students"),
        (name = "Enrollment", description = "Students in a class"),
        (name = "Lessons", description = "PDF lessons"),
        (name = "Papers", description = "PDF papers"),
        (name = "Videos", description = "Externally hosted video links"),
        (name = "Attendance", description = "Per-session attendance"),
        (name = "Payments", description = "Fee payments"),
        (name = "Profile", description = "Teacher homepage profile"),
        (name = "Stats", description = "Dashboard figures"),
        (name = "Health", description = "Service health"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create the media store selected by `storage.backend`.
pub async fn build_media_store(config: &AppConfig) -> Result<Arc<dyn MediaStore>, StorageError> {
    let storage = &config.storage;
    let store: Arc<dyn MediaStore> = match storage.backend {
        StorageBackend::Filesystem => Arc::new(
            FilesystemMediaStore::new(storage.filesystem.root.clone(), &storage.public_base_url)
                .await?,
        ),
        StorageBackend::S3 => {
            let settings = storage.s3.as_ref().ok_or_else(|| {
                StorageError::Remote("storage.backend is s3 but [storage.s3] is missing".into())
            })?;
            Arc::new(S3MediaStore::new(settings, &storage.public_base_url)?)
        }
    };
    Ok(store)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cors.max_age));

    if cors.allow_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = cors
        .allow_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let cors = cors_layer(&state.config.server.cors);
    let media_root = match state.config.storage.backend {
        StorageBackend::Filesystem => Some(state.config.storage.filesystem.root.clone()),
        StorageBackend::S3 => None,
    };

    let mut router = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    if let Some(root) = media_root {
        router = router.nest_service("/media", ServeDir::new(root));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
