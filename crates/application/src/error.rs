use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::generator::GeneratorError;
use crate::password::PasswordHasherError;

// 注意：推送失败（PushError）从不进入这里——投递是尽力而为，
// 失败只在触发点记录日志，绝不让它冒泡成操作错误。
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0:?}")]
    Repository(RepositoryError),
    #[error("password error: {0}")]
    Password(#[from] PasswordHasherError),
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
    #[error("authentication failed")]
    Authentication,
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Repository(value)
    }
}
