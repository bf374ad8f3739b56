//! Error responses.
//!
//! Every failure leaves the API as `{"error": "<message>"}`. The status is
//! chosen here and nowhere else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::application::StudentAdminError;
use crate::error::{Error, IdentityError};

const INTERNAL: &str = "Internal server error";

/// An error response: status code plus the `{"error": ...}` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn identity_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::Rejected(_) => StatusCode::BAD_REQUEST,
        IdentityError::NotFound(_) => StatusCode::NOT_FOUND,
        IdentityError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Domain(e) => Self::bad_request(e.to_string()),
            Error::NotFound { .. } => Self::not_found(err.to_string()),
            Error::Conflict(_) => Self::new(StatusCode::CONFLICT, err.to_string()),
            Error::Identity(e) => {
                let status = identity_status(e);
                if status.is_server_error() {
                    error!(error = %e, "Identity provider failure");
                }
                Self::new(status, e.to_string())
            }
            _ => {
                error!(error = %err, "Request failed");
                Self::internal(INTERNAL)
            }
        }
    }
}

impl From<StudentAdminError> for ApiError {
    fn from(err: StudentAdminError) -> Self {
        match err {
            StudentAdminError::Invalid(e) => Self::bad_request(e.to_string()),
            StudentAdminError::UnknownBusiness | StudentAdminError::StudentNotFound => {
                Self::not_found(err.to_string())
            }
            StudentAdminError::IdentityRejected(ref e) => {
                let status = match identity_status(e) {
                    StatusCode::NOT_FOUND => StatusCode::BAD_REQUEST,
                    other => other,
                };
                warn!(error = %e, "Identity provider refused student");
                Self::new(status, err.to_string())
            }
            StudentAdminError::ProfileCreate(_)
            | StudentAdminError::IdentityDelete(_)
            | StudentAdminError::ProfileDelete(_) => Self::internal(err.to_string()),
            StudentAdminError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn maps_crate_errors_to_statuses() {
        let cases = [
            (
                Error::Domain(DomainError::NoUsablePackage),
                StatusCode::BAD_REQUEST,
            ),
            (Error::not_found("class", "c1"), StatusCode::NOT_FOUND),
            (Error::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                Error::Database("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let api = ApiError::from(Error::Database("table users is locked".into()));
        assert_eq!(api.message, INTERNAL);
    }

    #[test]
    fn admin_messages_pass_through() {
        let api = ApiError::from(StudentAdminError::StudentNotFound);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "Student not found or access denied");

        let api = ApiError::from(StudentAdminError::IdentityRejected(IdentityError::Rejected(
            "Password should be at least 6 characters".into(),
        )));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Password should be at least 6 characters");
    }
}
