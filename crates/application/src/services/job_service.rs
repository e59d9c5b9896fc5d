use std::sync::Arc;

use domain::{
    ensure_owner, DomainError, Job, JobFilter, JobId, JobRepository, JobStatus, JobUpdate,
    Timestamp, UserId, UserRepository, UserRole,
};
use uuid::Uuid;

use crate::{clock::Clock, error::ApplicationError};

#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: i64,
    pub deadline: Timestamp,
    pub city: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub budget: Option<i64>,
    pub deadline: Option<Timestamp>,
    pub city: Option<String>,
    pub status: Option<JobStatus>,
}

pub struct JobServiceDependencies {
    pub job_repository: Arc<dyn JobRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct JobService {
    deps: JobServiceDependencies,
}

impl JobService {
    pub fn new(deps: JobServiceDependencies) -> Self {
        Self { deps }
    }

    /// 创建职位。发布者必须是 client 角色。
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<Job, ApplicationError> {
        let client_id = UserId::from(request.client_id);
        let client = self
            .deps
            .user_repository
            .find_by_id(client_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        if client.role != UserRole::Client {
            return Err(DomainError::ClientRoleRequired.into());
        }

        let now = self.deps.clock.now();
        let job = Job::post(
            JobId::generate(),
            request.title,
            request.description,
            request.category,
            request.budget,
            request.deadline,
            request.city,
            client_id,
            now,
        )?;

        let stored = self.deps.job_repository.create(job).await?;
        Ok(stored)
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, ApplicationError> {
        let jobs = self.deps.job_repository.list(&filter).await?;
        Ok(jobs)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ApplicationError> {
        self.deps
            .job_repository
            .find_by_id(JobId::from(job_id))
            .await?
            .ok_or_else(|| DomainError::JobNotFound.into())
    }

    pub async fn my_jobs(&self, client_id: Uuid) -> Result<Vec<Job>, ApplicationError> {
        let jobs = self
            .deps
            .job_repository
            .list_by_client(UserId::from(client_id))
            .await?;
        Ok(jobs)
    }

    pub async fn update_job(
        &self,
        job_id: Uuid,
        caller: Uuid,
        request: UpdateJobRequest,
    ) -> Result<Job, ApplicationError> {
        let mut job = self.get_job(job_id).await?;
        ensure_owner(job.client_id, UserId::from(caller))?;

        let update = JobUpdate {
            title: request.title,
            description: request.description,
            category: request.category,
            budget: request.budget,
            deadline: request.deadline,
            city: request.city,
            status: request.status,
        };
        job.apply_update(update, self.deps.clock.now())?;

        let stored = self.deps.job_repository.update(job).await?;
        Ok(stored)
    }

    pub async fn delete_job(&self, job_id: Uuid, caller: Uuid) -> Result<(), ApplicationError> {
        let job = self.get_job(job_id).await?;
        ensure_owner(job.client_id, UserId::from(caller))?;

        self.deps.job_repository.delete(job.id).await?;
        Ok(())
    }
}
