use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::auth::Actor;
use crate::errors::{CatalogError, ImportExportError};

/// Error body returned by every handler: `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_conflict() {
            StatusCode::CONFLICT
        } else if matches!(err, CatalogError::TypeMismatch { .. }) {
            StatusCode::UNPROCESSABLE_ENTITY
        } else if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status,
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl From<ImportExportError> for ApiError {
    fn from(err: ImportExportError) -> Self {
        match err {
            ImportExportError::Catalog(inner) => inner.into(),
            err => {
                let status = if matches!(err, ImportExportError::FileTooLarge { .. }) {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };

                Self {
                    status,
                    code: err.error_code(),
                    message: err.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}: {}", self.code, self.message);
        }

        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

/// The acting user, taken from the trusted `x-user-id` header.
/// Requests without the header run as the system actor.
pub struct CurrentActor(pub Actor);

pub const USER_HEADER: &str = "x-user-id";

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(CurrentActor(Actor::system()));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(|user_id| CurrentActor(Actor::user(user_id)))
            .ok_or_else(|| {
                ApiError::bad_request("INVALID_USER", format!("{} must be a user id", USER_HEADER))
            })
    }
}
