//! The error type returned by every handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pengajuan_core::{models::Envelope, ports::TransitionFailure, workflow::WorkflowError};
use std::fmt::Display;
use tracing::{Level, event};

/// A failed request: an HTTP status and the message placed in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The HTTP status of the response
    pub status: StatusCode,
    /// The human-readable reason
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 401: no usable session.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "not authorized")
    }

    /// 403: the session may not do this.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// 404: the target does not exist.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 409: the record is not in a state that allows this.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// 422: the request is well-formed but its preconditions fail.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 500: log the underlying error and report `context` to the caller.
    pub fn storage<E: Display>(context: impl Into<String>) -> impl FnOnce(E) -> Self {
        let context = context.into();
        move |err| {
            event!(Level::ERROR, err = err.to_string());
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let status = match err {
            WorkflowError::Forbidden { .. } | WorkflowError::NotOwner => StatusCode::FORBIDDEN,
            WorkflowError::InvalidStatus { .. } => StatusCode::CONFLICT,
            WorkflowError::Guard(_) | WorkflowError::InvalidVerification(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<TransitionFailure> for ApiError {
    fn from(failure: TransitionFailure) -> Self {
        match failure {
            TransitionFailure::DoesNotExist => Self::not_found("unknown submission"),
            TransitionFailure::Conflict(status) => {
                Self::conflict(format!("submission is now {status}; reload and try again"))
            }
            TransitionFailure::Refused(err) => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::<()>::failure(self.message))).into_response()
    }
}

impl aide::OperationOutput for ApiError {
    type Inner = Self;
}
