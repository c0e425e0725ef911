mod error;
mod handlers;

pub use error::{ApiError, FailureBody, PackageErrorBody, TenantErrorBody};

use std::path::PathBuf;

use axum::{routing::get, Router};
use initai_core::PackageLibrary;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub library: PackageLibrary,
    pub script_version: String,
    /// Hosted installer scripts (`/initai.py`, `/install.py`, ...) and
    /// their `changelog.json`.
    pub scripts_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(library: PackageLibrary, script_version: impl Into<String>) -> Self {
        Self {
            library,
            script_version: script_version.into(),
            scripts_dir: None,
        }
    }

    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = Some(dir.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let library =
            PackageLibrary::open(config.packages_root.clone()).with_tenant(config.tenant.clone());
        Self {
            scripts_dir: config.scripts_dir.clone(),
            ..Self::new(library, config.script_version.clone())
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Packages
        .route("/init/{tenant}/list", get(handlers::list_catalog))
        .route(
            "/init/{tenant}/{framework}/{scope}",
            get(handlers::download_universal),
        )
        .route(
            "/init/{tenant}/{framework}/{scope}/{llm}",
            get(handlers::download_variant),
        )
        // Installer scripts
        .route("/api/check-updates", get(handlers::check_updates))
        // Health
        .route("/health", get(handlers::health));

    // Anything unrouted is looked up among the hosted installer scripts.
    let router = match &state.scripts_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
