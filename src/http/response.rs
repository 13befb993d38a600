//! Response construction and error mapping.
//!
//! # Status Mapping
//! - `InvalidIdentifier`, `MalformedBody` → 400 Bad Request
//! - `ListNotFound`, `ItemNotFound` → 404 Not Found
//! - `NameConflict`, `VersionConflict` → 409 Conflict
//!
//! ETags travel as the bare decimal value in the `ETag` header.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::store::{Conditional, StoreError};
use crate::versioning::ETag;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path identifier is not a list id.
    #[error("Invalid shopping list id '{0}'")]
    InvalidIdentifier(String),

    /// Body is empty or does not decode.
    #[error("Could not parse request body: {0}")]
    MalformedBody(serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Error mapper for writes on `resource` that also accounts for
    /// rejected preconditions.
    pub fn on(resource: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |err| {
            if let StoreError::VersionConflict { current, supplied } = &err {
                metrics::record_version_conflict(resource);
                tracing::warn!(
                    resource,
                    current = %current,
                    supplied = ?supplied,
                    "Rejected write with stale or missing If-Match"
                );
            }
            ApiError::Store(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::ListNotFound(_) | StoreError::ItemNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(StoreError::NameConflict { .. } | StoreError::VersionConflict { .. }) => {
                StatusCode::CONFLICT
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}

/// Answer a conditional read: 200 with ETag and body, or a bare 304.
pub fn read_response<T: Serialize>(resource: &'static str, read: Conditional<T>) -> Response {
    match read {
        Conditional::Modified { etag, body } => {
            (StatusCode::OK, [(header::ETAG, etag.to_string())], Json(body)).into_response()
        }
        Conditional::NotModified => {
            metrics::record_not_modified(resource);
            tracing::debug!(resource, "Not modified");
            StatusCode::NOT_MODIFIED.into_response()
        }
    }
}

/// 201 with the new resource's ETag, its Location, and a body.
pub fn created<T: Serialize>(etag: ETag, location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::ETAG, etag.to_string()), (header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// A bodiless write acknowledgement carrying the new ETag.
pub fn written(status: StatusCode, etag: ETag) -> Response {
    (status, [(header::ETAG, etag.to_string())]).into_response()
}
