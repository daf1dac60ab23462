use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::catalog::RuleViolation;
use crate::tree::{CycleError, TreeError};

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "Products cannot have children",
    "code": "illegal_children",
    "request_id": "2b0c5d1e-7f7a-4c55-9d55-8a4f1b7c2e10",
    "timestamp": "2025-03-02T10:30:00+00:00"
}))]
pub struct ErrorResponse {
    /// HTTP status category
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Human-readable description
    pub message: String,
    /// Machine-readable error code
    #[schema(example = "illegal_children")]
    pub code: String,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation error: {0}")]
    FieldValidation(
        #[from]
        #[serde(skip)]
        ValidationErrors,
    ),

    #[error("{0}")]
    Rule(#[from] RuleViolation),

    #[error("{0}")]
    Cycle(
        #[from]
        #[serde(skip)]
        CycleError,
    ),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<TreeError> for ServiceError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Cycle(cycle) => ServiceError::Cycle(cycle),
            TreeError::NodeNotFound(id) => {
                ServiceError::NotFound(format!("Node with ID {} not found", id))
            }
            TreeError::InvalidPosition(msg) => ServiceError::BadRequest(msg),
            TreeError::Database(db) => ServiceError::DatabaseError(db),
        }
    }
}

impl ServiceError {
    pub fn not_found(resource: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} with ID {} not found", resource, id))
    }

    /// A single field-level validation failure
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        let mut error = ValidationError::new("invalid");
        error.message = Some(message.into().into());
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        ServiceError::FieldValidation(errors)
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_)
            | Self::FieldValidation(_)
            | Self::Rule(_)
            | Self::Cycle(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Rule(violation) => violation.code(),
            Self::Cycle(_) => "cycle",
            Self::NotFound(_) => "not_found",
            Self::ValidationError(_) | Self::FieldValidation(_) => "validation_error",
            Self::BadRequest(_) => "bad_request",
            Self::DatabaseError(_) => "database_error",
            Self::InternalError(_) | Self::Other(_) => "internal_error",
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) | Self::Other(_) => "Internal server error".to_string(),
            Self::FieldValidation(_) => "Validation error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn field_messages(&self) -> Option<BTreeMap<String, Vec<String>>> {
        match self {
            Self::FieldValidation(errors) => {
                let mut out = BTreeMap::new();
                flatten_validation(errors, None, &mut out);
                Some(out)
            }
            _ => None,
        }
    }
}

fn flatten_validation(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                for error in list {
                    messages.push(
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string()),
                    );
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::DatabaseError(_) | Self::InternalError(_) | Self::Other(_) => {
                tracing::error!(error = %self, "request failed");
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            code: self.code().to_string(),
            fields: self.field_messages(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
