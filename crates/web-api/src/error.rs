use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::GeneratorError;
        use domain::{DomainError, RepositoryError};
        use ApplicationError as AppErr;

        match error {
            AppErr::Domain(DomainError::InvalidArgument { field, reason }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                format!("{}: {}", field, reason),
            ),
            AppErr::Domain(DomainError::UserAlreadyExists) => {
                ApiError::new(StatusCode::CONFLICT, "USER_EXISTS", "user already exists")
            }
            AppErr::Domain(DomainError::UserNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "user not found")
            }
            AppErr::Domain(DomainError::JobNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "JOB_NOT_FOUND", "job not found")
            }
            AppErr::Domain(DomainError::ApplicationNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "APPLICATION_NOT_FOUND",
                "application not found",
            ),
            AppErr::Domain(DomainError::NotificationNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "NOTIFICATION_NOT_FOUND",
                "notification not found",
            ),
            AppErr::Domain(DomainError::DuplicateApplication) => ApiError::new(
                StatusCode::CONFLICT,
                "DUPLICATE_APPLICATION",
                "already applied to this job",
            ),
            AppErr::Domain(DomainError::NotOwner) => ApiError::new(
                StatusCode::FORBIDDEN,
                "NOT_OWNER",
                "caller does not own this resource",
            ),
            AppErr::Domain(DomainError::ClientRoleRequired) => ApiError::new(
                StatusCode::FORBIDDEN,
                "CLIENT_ROLE_REQUIRED",
                "operation requires the client role",
            ),
            AppErr::Domain(DomainError::InvalidStatusTransition) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_STATUS_TRANSITION",
                "invalid status transition",
            ),
            AppErr::Repository(repo_err) => match repo_err {
                RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                RepositoryError::Storage { message } => ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    format!("database error: {}", message),
                ),
            },
            AppErr::Password(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PASSWORD_ERROR",
                format!("password error: {}", err),
            ),
            AppErr::Generator(GeneratorError::NotConfigured(message)) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATOR_NOT_CONFIGURED",
                message,
            ),
            AppErr::Generator(GeneratorError::Failed(message)) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                message,
            ),
            AppErr::Authentication => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_FAILED",
                "authentication failed",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
