use std::sync::Arc;

use domain::{
    ensure_owner, ApplicationId, ApplicationRepository, ApplicationStatus, DomainError, JobApplication,
    JobId, JobRepository, NotificationKind, RepositoryError, UserId, UserRepository,
};
use uuid::Uuid;

use crate::{
    clock::Clock, error::ApplicationError,
    services::notification_service::NotificationService,
};

#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    pub cover_letter: String,
    pub resume: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DecideApplicationRequest {
    pub application_id: Uuid,
    pub caller: Uuid,
    pub status: ApplicationStatus,
}

pub struct ApplicationServiceDependencies {
    pub application_repository: Arc<dyn ApplicationRepository>,
    pub job_repository: Arc<dyn JobRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notifications: Arc<NotificationService>,
    pub clock: Arc<dyn Clock>,
}

pub struct ApplicationService {
    deps: ApplicationServiceDependencies,
}

impl ApplicationService {
    pub fn new(deps: ApplicationServiceDependencies) -> Self {
        Self { deps }
    }

    /// 投递申请。同一 (职位, 自由职业者) 只允许一份：
    /// 先做存在性检查，存储层的唯一索引兜住并发窗口。
    pub async fn apply(&self, request: ApplyRequest) -> Result<JobApplication, ApplicationError> {
        let job_id = JobId::from(request.job_id);
        let freelancer_id = UserId::from(request.freelancer_id);

        let job = self
            .deps
            .job_repository
            .find_by_id(job_id)
            .await?
            .ok_or(DomainError::JobNotFound)?;

        if self
            .deps
            .application_repository
            .find_by_job_and_freelancer(job_id, freelancer_id)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateApplication.into());
        }

        let application = JobApplication::submit(
            ApplicationId::generate(),
            job_id,
            freelancer_id,
            request.cover_letter,
            request.resume,
            self.deps.clock.now(),
        )?;

        let stored = match self.deps.application_repository.create(application).await {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(DomainError::DuplicateApplication.into())
            }
            Err(err) => return Err(err.into()),
        };

        // 通知职位所有者；失败不影响申请本身
        self.fan_out_received(&stored, &job).await;

        Ok(stored)
    }

    async fn fan_out_received(&self, application: &JobApplication, job: &domain::Job) {
        let freelancer_name = match self
            .deps
            .user_repository
            .find_by_id(application.freelancer_id)
            .await
        {
            Ok(Some(freelancer)) => freelancer.name.to_string(),
            Ok(None) | Err(_) => {
                tracing::warn!(
                    freelancer_id = %application.freelancer_id,
                    "freelancer lookup failed, skipping notification"
                );
                return;
            }
        };

        let result = self
            .deps
            .notifications
            .notify(
                job.client_id,
                application.freelancer_id,
                NotificationKind::ApplicationReceived,
                format!("{} applied for: {}", freelancer_name, job.title),
                format!("/applications/{}", job.id),
            )
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, "notification fan-out failed");
        }
    }

    /// 某职位收到的申请；只有职位所有者可以查看。
    pub async fn list_for_job(
        &self,
        job_id: Uuid,
        caller: Uuid,
    ) -> Result<Vec<JobApplication>, ApplicationError> {
        let job = self
            .deps
            .job_repository
            .find_by_id(JobId::from(job_id))
            .await?
            .ok_or(DomainError::JobNotFound)?;
        ensure_owner(job.client_id, UserId::from(caller))?;

        let applications = self
            .deps
            .application_repository
            .list_by_job(job.id)
            .await?;
        Ok(applications)
    }

    pub async fn my_applications(
        &self,
        freelancer_id: Uuid,
    ) -> Result<Vec<JobApplication>, ApplicationError> {
        let applications = self
            .deps
            .application_repository
            .list_by_freelancer(UserId::from(freelancer_id))
            .await?;
        Ok(applications)
    }

    /// 接受或拒绝一份申请。只有职位所有者可以定案；
    /// 只有 accepted / rejected 两个结果会产生通知。
    pub async fn decide(
        &self,
        request: DecideApplicationRequest,
    ) -> Result<JobApplication, ApplicationError> {
        let mut application = self
            .deps
            .application_repository
            .find_by_id(ApplicationId::from(request.application_id))
            .await?
            .ok_or(DomainError::ApplicationNotFound)?;

        let job = self
            .deps
            .job_repository
            .find_by_id(application.job_id)
            .await?
            .ok_or(DomainError::JobNotFound)?;
        ensure_owner(job.client_id, UserId::from(request.caller))?;

        application.decide(request.status, self.deps.clock.now())?;
        let stored = self.deps.application_repository.update(application).await?;

        let kind = match stored.status {
            ApplicationStatus::Accepted => NotificationKind::ApplicationAccepted,
            ApplicationStatus::Rejected => NotificationKind::ApplicationRejected,
            // decide 之后不可能仍是 Pending
            ApplicationStatus::Pending => return Ok(stored),
        };
        let verdict = match stored.status {
            ApplicationStatus::Accepted => "accepted",
            _ => "rejected",
        };

        let result = self
            .deps
            .notifications
            .notify(
                stored.freelancer_id,
                job.client_id,
                kind,
                format!("Your application for {} was {}", job.title, verdict),
                "/my-applications".to_string(),
            )
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, "notification fan-out failed");
        }

        Ok(stored)
    }
}
