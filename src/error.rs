use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use axum_valid::{ValidRejection, ValidationRejection};
use thiserror::Error;
use tracing::{debug, error};
use workflow::validation::field_errors;
use workflow::{ConflictKind, WorkflowError};

use crate::schemas::ErrorResponse;

/// Error returned by every handler; wraps the workflow failure and decides
/// the status code and payload.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub WorkflowError);

impl AppError {
    /// HTTP status and numeric error code for the wrapped failure.
    pub fn status_and_code(&self) -> (StatusCode, i32) {
        match &self.0 {
            WorkflowError::Validation(_) => (StatusCode::BAD_REQUEST, 1),
            WorkflowError::Conflict(kind) => {
                let code = match kind {
                    ConflictKind::Email => 1,
                    ConflictKind::Username => 2,
                    ConflictKind::AllergenName | ConflictKind::RecipeName => 3,
                    ConflictKind::StaleRecord => 4,
                };
                (StatusCode::CONFLICT, code)
            }
            WorkflowError::Unauthorized(_) | WorkflowError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, 2)
            }
            WorkflowError::NotFound(_) => (StatusCode::NOT_FOUND, 1),
            WorkflowError::Database(_) | WorkflowError::PasswordHash(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, 0)
            }
        }
    }
}

impl AppError {
    /// Input axum could not extract, reported as a field error on `source`.
    fn rejected(source: &str, message: String) -> Self {
        debug!("Rejected request {}: {}", source, message);
        AppError(WorkflowError::invalid_field(source, message))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected("body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected("query", rejection.body_text())
    }
}

impl From<ValidRejection<QueryRejection>> for AppError {
    fn from(rejection: ValidRejection<QueryRejection>) -> Self {
        match rejection {
            ValidationRejection::Valid(errors) => {
                AppError(WorkflowError::Validation(field_errors(&errors)))
            }
            ValidationRejection::Inner(inner) => inner.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self.0 {
            WorkflowError::Validation(errors) => ErrorResponse {
                code,
                message: WorkflowError::Validation(errors.clone()).to_string(),
                errors: Some(errors),
            },
            internal @ (WorkflowError::Database(_) | WorkflowError::PasswordHash(_)) => {
                error!("Request failed with internal error: {}", internal);
                ErrorResponse {
                    code,
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            other => ErrorResponse {
                code,
                message: other.to_string(),
                errors: None,
            },
        };
        debug!("Responding with {} (code {}): {}", status, code, body.message);

        if status == StatusCode::UNAUTHORIZED {
            (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"cookbook\"")],
                Json(body),
            )
                .into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}
