//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gradebook_types::error::{AuthError, GradeError, RepositoryError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Login and session errors.
    Auth(AuthError),
    /// Grade, class and course errors.
    Grade(GradeError),
    /// Storage failures outside a domain error.
    Repository(RepositoryError),
    /// Malformed request input.
    Validation(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<GradeError> for AppError {
    fn from(e: GradeError) -> Self {
        AppError::Grade(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Auth(AuthError::UnknownUser(_) | AuthError::WrongPassword) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
            }
            AppError::Auth(AuthError::SessionExpired) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Auth(AuthError::Forbidden(_)) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR"),
            AppError::Grade(GradeError::ClassNotFound(_)) => (StatusCode::NOT_FOUND, "CLASS_NOT_FOUND"),
            AppError::Grade(GradeError::CourseNotFound(_)) => {
                (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND")
            }
            AppError::Grade(GradeError::StudentNotFound(_)) => {
                (StatusCode::NOT_FOUND, "STUDENT_NOT_FOUND")
            }
            AppError::Grade(GradeError::ScoreOutOfRange { .. } | GradeError::InvalidScore(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Grade(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GRADE_ERROR"),
            AppError::Repository(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Repository(RepositoryError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Auth(e) => e.to_string(),
            AppError::Grade(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %self.message(), "request failed");
        }
        ApiResponse::error(code, &self.message()).into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(AuthError::WrongPassword).parts().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Forbidden("no".to_string())).parts().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(GradeError::ClassNotFound("tc9".to_string())).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(GradeError::InvalidScore("x".to_string())).parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepositoryError::Query("boom".to_string())).parts().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_uses_envelope() {
        let response = AppError::Validation("bad sort key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
