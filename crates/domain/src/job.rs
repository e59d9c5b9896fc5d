use crate::errors::DomainError;
use crate::value_objects::{JobId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: i64,
    pub deadline: Timestamp,
    pub city: String,
    pub client_id: UserId,
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// 职位列表筛选条件，全部可选。
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// 对标题和描述做大小写不敏感的子串匹配
    pub search: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
}

/// 职位可变字段；None 表示保留原值。
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub budget: Option<i64>,
    pub deadline: Option<Timestamp>,
    pub city: Option<String>,
    pub status: Option<JobStatus>,
}

impl Job {
    #[allow(clippy::too_many_arguments)]
    pub fn post(
        id: JobId,
        title: String,
        description: String,
        category: String,
        budget: i64,
        deadline: Timestamp,
        city: String,
        client_id: UserId,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_budget(budget)?;

        Ok(Self {
            id,
            title,
            description,
            category,
            budget,
            deadline,
            city,
            client_id,
            status: JobStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: JobUpdate, now: Timestamp) -> Result<(), DomainError> {
        if let Some(title) = update.title {
            Self::validate_title(&title)?;
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(budget) = update.budget {
            Self::validate_budget(budget)?;
            self.budget = budget;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::invalid_argument("title", "cannot be empty"));
        }
        if title.len() > 200 {
            return Err(DomainError::invalid_argument("title", "too long"));
        }
        Ok(())
    }

    fn validate_budget(budget: i64) -> Result<(), DomainError> {
        if budget < 0 {
            return Err(DomainError::invalid_argument(
                "budget",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

impl JobFilter {
    /// 内存实现使用的匹配逻辑；Postgres 实现用等价的 SQL 条件。
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !job.title.to_lowercase().contains(&needle)
                && !job.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &job.category != category {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !job.city.to_lowercase().contains(&city.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_budget {
            if job.budget < min {
                return false;
            }
        }
        if let Some(max) = self.max_budget {
            if job.budget > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_job() -> Job {
        Job::post(
            JobId::generate(),
            "Fix kitchen sink".to_string(),
            "The drain is leaking under the counter".to_string(),
            "plumbing".to_string(),
            150,
            Utc::now() + Duration::days(7),
            "Hamburg".to_string(),
            UserId::generate(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn post_rejects_negative_budget() {
        let result = Job::post(
            JobId::generate(),
            "t".to_string(),
            "d".to_string(),
            "c".to_string(),
            -1,
            Utc::now(),
            "Berlin".to_string(),
            UserId::generate(),
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn new_job_starts_active() {
        assert_eq!(sample_job().status, JobStatus::Active);
    }

    #[test]
    fn filter_matches_search_in_description() {
        let job = sample_job();
        let filter = JobFilter {
            search: Some("LEAKING".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&job));

        let miss = JobFilter {
            search: Some("electrical".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&job));
    }

    #[test]
    fn filter_budget_range_is_inclusive() {
        let job = sample_job();
        let filter = JobFilter {
            min_budget: Some(150),
            max_budget: Some(150),
            ..Default::default()
        };
        assert!(filter.matches(&job));

        let below = JobFilter {
            min_budget: Some(151),
            ..Default::default()
        };
        assert!(!below.matches(&job));
    }
}
