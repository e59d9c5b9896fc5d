use crate::errors::DomainError;
use crate::value_objects::{ApplicationId, JobId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub freelancer_id: UserId,
    pub cover_letter: String,
    pub resume: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobApplication {
    pub fn submit(
        id: ApplicationId,
        job_id: JobId,
        freelancer_id: UserId,
        cover_letter: String,
        resume: Option<String>,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if cover_letter.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "cover_letter",
                "cannot be empty",
            ));
        }

        Ok(Self {
            id,
            job_id,
            freelancer_id,
            cover_letter,
            resume,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// 状态只允许从 Pending 迁移到 Accepted 或 Rejected。
    pub fn decide(&mut self, target: ApplicationStatus, now: Timestamp) -> Result<(), DomainError> {
        if self.status != ApplicationStatus::Pending {
            return Err(DomainError::InvalidStatusTransition);
        }
        match target {
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => {
                self.status = target;
                self.updated_at = now;
                Ok(())
            }
            ApplicationStatus::Pending => Err(DomainError::InvalidStatusTransition),
        }
    }
}
