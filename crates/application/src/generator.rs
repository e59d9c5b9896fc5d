use async_trait::async_trait;
use thiserror::Error;

/// 求职信草稿的生成入参。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub job_description: String,
    pub freelancer_name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator is not configured: {0}")]
    NotConfigured(String),
    #[error("generation failed: {0}")]
    Failed(String),
}

impl GeneratorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 黑盒文本生成调用：入参为职位与申请人信息，返回草稿文本。
#[async_trait]
pub trait CoverLetterGenerator: Send + Sync {
    async fn generate(&self, request: &CoverLetterRequest) -> Result<String, GeneratorError>;
}
