use crate::policy::{
    leave::{FieldError, LeaveError, LeaveRuleViolation},
    review::ReviewError,
};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Please fix errors before submitting")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal Server Error")]
    Database(#[from] sqlx::Error),

    #[error("Internal Server Error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(e) => tracing::error!(error = %e, "Database error"),
            AppError::Internal(details) => tracing::error!(%details, "Internal error"),
            other => tracing::debug!(status = %other.status_code(), message = %other, "Request rejected"),
        }

        let body = match self {
            AppError::Validation(fields) => json!({
                "message": self.to_string(),
                "errors": fields.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            _ => json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<LeaveError> for AppError {
    fn from(error: LeaveError) -> Self {
        match error {
            LeaveError::Structural(fields) => AppError::Validation(fields),
            LeaveError::Rule(rule @ LeaveRuleViolation::Overlap { .. }) => {
                AppError::Conflict(rule.to_string())
            }
            LeaveError::Rule(rule) => AppError::BadRequest(rule.to_string()),
        }
    }
}

impl From<LeaveRuleViolation> for AppError {
    fn from(rule: LeaveRuleViolation) -> Self {
        LeaveError::Rule(rule).into()
    }
}

impl From<ReviewError> for AppError {
    fn from(error: ReviewError) -> Self {
        match error {
            ReviewError::SelfReview => AppError::Forbidden(error.to_string()),
            ReviewError::ReasonRequired
            | ReviewError::InvalidTarget
            | ReviewError::AlreadyProcessed => AppError::BadRequest(error.to_string()),
        }
    }
}
