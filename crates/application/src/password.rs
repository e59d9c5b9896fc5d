//! 密码哈希调用面。
//!
//! 具体算法在基础设施层；用户服务只依赖这里的接口，
//! 拿到的结果统一是领域层的 `PasswordHash`。

use async_trait::async_trait;
use domain::PasswordHash;
use thiserror::Error;

/// 哈希或校验失败，记录出错环节与底层原因。
#[derive(Debug, Error)]
#[error("password {operation} failed: {message}")]
pub struct PasswordHasherError {
    operation: &'static str,
    message: String,
}

impl PasswordHasherError {
    pub fn hashing(cause: impl ToString) -> Self {
        Self {
            operation: "hashing",
            message: cause.to_string(),
        }
    }

    pub fn verification(cause: impl ToString) -> Self {
        Self {
            operation: "verification",
            message: cause.to_string(),
        }
    }
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;
    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_the_failing_operation() {
        let err = PasswordHasherError::hashing("cost out of range");
        assert_eq!(err.to_string(), "password hashing failed: cost out of range");

        let err = PasswordHasherError::verification("malformed hash");
        assert_eq!(
            err.to_string(),
            "password verification failed: malformed hash"
        );
    }
}
