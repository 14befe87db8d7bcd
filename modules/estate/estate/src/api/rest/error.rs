use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use estate_sdk::{ErrorKind, EstateError};
use serde::Serialize;

use crate::domain::error::DomainError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 problem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Machine-readable error kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, axum::Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Map an SDK error to its problem document.
pub fn estate_error_to_problem(e: &EstateError) -> Problem {
    let (status, title) = match e.kind() {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "Conflict"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
        ErrorKind::AuthBackendUnavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
        }
        ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    };
    Problem::new(status, title, e.message()).with_code(e.kind().as_str())
}

/// Implement Into<Problem> for `DomainError` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        if matches!(e, DomainError::Database { .. }) {
            // Details are logged, never sent to the client.
            tracing::error!(error = %e, "Database error occurred");
        }
        estate_error_to_problem(&EstateError::from(e))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_status_and_code() {
        let cases = [
            (DomainError::not_found("flat", Uuid::nil()), 404, "not_found"),
            (DomainError::conflict("floor", "dup"), 409, "conflict"),
            (DomainError::forbidden("no"), 403, "forbidden"),
            (
                DomainError::auth_backend_unavailable("down"),
                503,
                "auth_backend_unavailable",
            ),
            (DomainError::validation("name", "empty"), 422, "validation"),
            (DomainError::database("member", "disk full"), 500, "internal"),
        ];
        for (err, status, code) in cases {
            let problem = Problem::from(err);
            assert_eq!(problem.status, status);
            assert_eq!(problem.code.as_deref(), Some(code));
        }
    }

    #[test]
    fn database_detail_is_hidden() {
        let problem = Problem::from(DomainError::database("member", "disk full at /var"));
        assert!(!problem.detail.contains("/var"));
    }

    #[test]
    fn response_uses_problem_content_type() {
        let response = Problem::new(StatusCode::CONFLICT, "Conflict", "dup").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_CONTENT_TYPE
        );
    }
}
