use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("could not validate credentials")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION".to_owned(),
                    message: msg.clone(),
                },
            ),
            // Every authentication failure renders the same status, body, and
            // challenge header; the discriminating cause only reaches the
            // server log.
            ApiError::Unauthorized => {
                let body = ApiErrorBody {
                    code: "UNAUTHORIZED".to_owned(),
                    message: "Could not validate credentials".to_owned(),
                };
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ApiErrorResponse { error: body }),
                )
                    .into_response();
            }
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_owned(),
                    message: format!("{what} not found"),
                },
            ),
            ApiError::Database(_) | ApiError::Internal(_) => {
                error!(fault = %self, "internal fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_owned(),
                        message: "An internal server error occurred.".to_owned(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
