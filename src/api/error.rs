//! Translation of package failures into HTTP responses.
//!
//! Every resolution failure is a 404 naming the tenant, framework, scope
//! and llm that could not be served; the `error` string tells the kinds
//! apart. Assembly failures are a 500 carrying the underlying reason.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use initai_core::{PackageError, PackageNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of a 404 for a download that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageErrorBody {
    pub error: String,
    pub tenant: String,
    pub framework: String,
    pub scope: String,
    pub llm: String,
}

/// Body of a 404 for an unknown tenant on the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantErrorBody {
    pub error: String,
    pub tenant: String,
}

/// Body of a 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub error: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("package could not be resolved")]
    PackageNotFound(PackageErrorBody),

    #[error("unknown tenant")]
    TenantNotFound(TenantErrorBody),

    #[error("failed to create package")]
    Failure(FailureBody),
}

impl ApiError {
    /// Map a failed download of `node` to its response.
    pub fn download(err: PackageError, node: &PackageNode) -> Self {
        let error = match &err {
            PackageError::InvalidTenant(_) => "Invalid tenant",
            PackageError::NotFound(_) => "Package not found",
            PackageError::Empty(_) => "Package is empty",
            PackageError::Assembly(reason) => {
                tracing::error!("Failed to assemble {}: {}", node, reason);
                return Self::failure(reason.clone());
            }
        };
        tracing::warn!("Download of {} refused: {}", node, err);
        Self::PackageNotFound(PackageErrorBody {
            error: error.to_string(),
            tenant: node.tenant.clone(),
            framework: node.framework.clone(),
            scope: node.scope.clone(),
            llm: node.variant.clone(),
        })
    }

    /// Map a failed catalog listing for `tenant` to its response.
    pub fn catalog(err: PackageError, tenant: &str) -> Self {
        match err {
            PackageError::InvalidTenant(_) => {
                tracing::warn!("Catalog requested for unknown tenant '{}'", tenant);
                Self::TenantNotFound(TenantErrorBody {
                    error: "Invalid tenant".to_string(),
                    tenant: tenant.to_string(),
                })
            }
            other => {
                tracing::error!("Failed to build catalog for '{}': {}", tenant, other);
                Self::Failure(FailureBody {
                    error: "Failed to list packages".to_string(),
                    reason: other.to_string(),
                })
            }
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(FailureBody {
            error: "Failed to create package".to_string(),
            reason: reason.into(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::PackageNotFound(_) | Self::TenantNotFound(_) => StatusCode::NOT_FOUND,
            Self::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::PackageNotFound(body) => (status, Json(body)).into_response(),
            Self::TenantNotFound(body) => (status, Json(body)).into_response(),
            Self::Failure(body) => (status, Json(body)).into_response(),
        }
    }
}
