use application::{PasswordHasher, PasswordHasherError};
use async_trait::async_trait;
use domain::PasswordHash;

/// 基于 bcrypt 的密码哈希。哈希计算放到阻塞线程池，避免卡住事件循环。
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(PasswordHasherError::hashing)?
            .map_err(PasswordHasherError::hashing)?;
        PasswordHash::new(hashed).map_err(PasswordHasherError::hashing)
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.as_str().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed))
            .await
            .map_err(PasswordHasherError::verification)?
            .map_err(PasswordHasherError::verification)
    }
}
