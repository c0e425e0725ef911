use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use initai_core::{Catalog, PackageNode};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::updates::{check_for_update, load_changelog, UpdateCheck};

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

pub async fn list_catalog(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<Catalog>, ApiError> {
    let library = state.library.clone();
    let lookup = tenant.clone();
    let catalog = tokio::task::spawn_blocking(move || library.build_catalog(&lookup))
        .await
        .map_err(|e| ApiError::failure(e.to_string()))?;

    catalog
        .map(Json)
        .map_err(|e| ApiError::catalog(e, &tenant))
}

// ============================================================
// Downloads
// ============================================================

pub async fn download_universal(
    State(state): State<AppState>,
    Path((tenant, framework, scope)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    download(state, PackageNode::from_request(tenant, framework, scope, None)).await
}

pub async fn download_variant(
    State(state): State<AppState>,
    Path((tenant, framework, scope, llm)): Path<(String, String, String, String)>,
) -> Result<Response, ApiError> {
    download(state, PackageNode::from_request(tenant, framework, scope, Some(llm))).await
}

/// Resolve and assemble on the blocking pool, then send the finished buffer.
async fn download(state: AppState, node: PackageNode) -> Result<Response, ApiError> {
    let library = state.library.clone();
    let request = node.clone();
    let archive = tokio::task::spawn_blocking(move || library.download(&request))
        .await
        .map_err(|e| ApiError::failure(e.to_string()))?
        .map_err(|e| ApiError::download(e, &node))?;

    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", archive.filename))
            .map_err(|e| {
                tracing::error!("Unusable attachment filename for {}: {}", node, e);
                ApiError::failure(format!("invalid attachment filename: {}", e))
            })?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, archive.bytes).into_response())
}

// ============================================================
// Installer scripts
// ============================================================

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub client_version: Option<String>,
    pub script: Option<String>,
}

pub async fn check_updates(
    State(state): State<AppState>,
    Query(query): Query<UpdateQuery>,
) -> Json<UpdateCheck> {
    let changelog = match &state.scripts_dir {
        Some(dir) => load_changelog(dir).await,
        None => Vec::new(),
    };
    Json(check_for_update(
        &state.script_version,
        query.client_version,
        query.script,
        changelog,
    ))
}
