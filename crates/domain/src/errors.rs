use thiserror::Error;

/// 领域层错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field}: {reason}")]
    InvalidArgument { field: String, reason: String },
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("job not found")]
    JobNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("notification not found")]
    NotificationNotFound,
    #[error("already applied to this job")]
    DuplicateApplication,
    #[error("caller does not own this resource")]
    NotOwner,
    #[error("operation requires the client role")]
    ClientRoleRequired,
    #[error("invalid status transition")]
    InvalidStatusTransition,
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 存储层错误，由仓储实现映射产生。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("requested record not found")]
    NotFound,
    #[error("record conflicts with an existing one")]
    Conflict,
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
