use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::users::dto::{InternalErrorBody, ValidationErrorBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    MissingField,
    UnexpectedType,
    WhitespaceNotAllowed,
    LengthOutOfBounds,
    DuplicateUsername,
}

impl ValidationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationKind::MissingField => "MissingField",
            ValidationKind::UnexpectedType => "UnexpectedType",
            ValidationKind::WhitespaceNotAllowed => "WhitespaceNotAllowed",
            ValidationKind::LengthOutOfBounds => "LengthOutOfBounds",
            ValidationKind::DuplicateUsername => "DuplicateUsername",
        }
    }
}

/// Client-caused failure naming exactly one offending field.
/// The message is safe to return verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
    pub location: &'static str,
}

impl ValidationError {
    pub fn missing_field(location: &'static str) -> Self {
        Self {
            kind: ValidationKind::MissingField,
            message: "Missing field".into(),
            location,
        }
    }

    pub fn unexpected_type(location: &'static str) -> Self {
        Self {
            kind: ValidationKind::UnexpectedType,
            message: "Expected string".into(),
            location,
        }
    }

    pub fn whitespace(location: &'static str) -> Self {
        Self {
            kind: ValidationKind::WhitespaceNotAllowed,
            message: "Cannot start or end with whitespace".into(),
            location,
        }
    }

    pub fn too_short(location: &'static str, min: usize) -> Self {
        Self {
            kind: ValidationKind::LengthOutOfBounds,
            message: format!("Must be at least {} characters long", min),
            location,
        }
    }

    pub fn too_long(location: &'static str, max: usize) -> Self {
        Self {
            kind: ValidationKind::LengthOutOfBounds,
            message: format!("Must be at most {} characters long", max),
            location,
        }
    }

    pub fn duplicate_username() -> Self {
        Self {
            kind: ValidationKind::DuplicateUsername,
            message: "Username already taken".into(),
            location: "username",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The request body could not be read, e.g. it exceeds the size limit.
    #[error(transparent)]
    Body(#[from] BytesRejection),
    /// Anything not caused by the request body. Never shown to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::Validation(v) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorBody {
                    code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                    reason: v.kind.as_str(),
                    message: &v.message,
                    location: v.location,
                }),
            )
                .into_response(),
            RegisterError::Body(e) => e.into_response(),
            RegisterError::Internal(e) => {
                error!(error = ?e, "registration failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InternalErrorBody {
                        code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                        message: "Something went wrong",
                    }),
                )
                    .into_response()
            }
        }
    }
}
