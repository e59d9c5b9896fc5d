use std::sync::Arc;

use domain::{DomainError, JobId, JobRepository, UserId, UserRepository};
use uuid::Uuid;

use crate::{
    error::ApplicationError,
    generator::{CoverLetterGenerator, CoverLetterRequest},
};

#[derive(Debug, Clone)]
pub struct DraftCoverLetterRequest {
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
}

pub struct CoverLetterServiceDependencies {
    pub job_repository: Arc<dyn JobRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub generator: Arc<dyn CoverLetterGenerator>,
}

/// 组装职位与申请人的上下文，交给黑盒生成器起草求职信。
pub struct CoverLetterService {
    deps: CoverLetterServiceDependencies,
}

impl CoverLetterService {
    pub fn new(deps: CoverLetterServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn draft(
        &self,
        request: DraftCoverLetterRequest,
    ) -> Result<String, ApplicationError> {
        let job = self
            .deps
            .job_repository
            .find_by_id(JobId::from(request.job_id))
            .await?
            .ok_or(DomainError::JobNotFound)?;
        let freelancer = self
            .deps
            .user_repository
            .find_by_id(UserId::from(request.freelancer_id))
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let draft = self
            .deps
            .generator
            .generate(&CoverLetterRequest {
                job_title: job.title,
                job_description: job.description,
                freelancer_name: freelancer.name.to_string(),
                skills: freelancer.skills,
            })
            .await?;
        Ok(draft)
    }
}
