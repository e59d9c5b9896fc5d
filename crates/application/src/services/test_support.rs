//! 服务单元测试共用的内存仓储与测试替身。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use domain::{
    ApplicationId, ApplicationRepository, DisplayName, Job, JobApplication, JobFilter, JobId,
    JobRepository, Message, MessageId, MessageRepository, Notification, NotificationId,
    NotificationRepository, PasswordHash, RepositoryError, RepositoryResult, Timestamp, User,
    UserEmail, UserId, UserRepository, UserRole,
};
use uuid::Uuid;

use crate::clock::Clock;
use crate::password::{PasswordHasher, PasswordHasherError};
use crate::pusher::{MessagePusher, PushError, ServerEvent};
use crate::services::{NotificationService, NotificationServiceDependencies};

/// 每次取值前进一秒的测试时钟，保证时间戳单调且互不相同。
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let mut current = self.current.lock().unwrap();
        *current += Duration::seconds(1);
        *current
    }
}

/// 明文“哈希”，仅用于测试。
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("plain:{plaintext}")).map_err(PasswordHasherError::hashing)
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("plain:{plaintext}"))
    }
}

/// 记录全部推送的注册表替身。
#[derive(Default)]
pub struct RecordingPusher {
    pub pushed: Mutex<Vec<(UserId, ServerEvent)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn push(&self, recipient: UserId, event: ServerEvent) -> Result<(), PushError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PushError::failed("simulated push failure"));
        }
        self.pushed.lock().unwrap().push((recipient, event));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: UserEmail) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryJobs {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobs {
    pub fn with(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobs {
    async fn create(&self, job: Job) -> RepositoryResult<Job> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn update(&self, job: Job) -> RepositoryResult<Job> {
        let mut jobs = self.jobs.lock().unwrap();
        let slot = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = job.clone();
        Ok(job)
    }

    async fn delete(&self, id: JobId) -> RepositoryResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> RepositoryResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn list_by_client(&self, client_id: UserId) -> RepositoryResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.client_id == client_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[derive(Default)]
pub struct InMemoryApplications {
    applications: Mutex<Vec<JobApplication>>,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplications {
    async fn create(&self, application: JobApplication) -> RepositoryResult<JobApplication> {
        let mut applications = self.applications.lock().unwrap();
        // 与迁移里的唯一索引一致
        if applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.freelancer_id == application.freelancer_id)
        {
            return Err(RepositoryError::Conflict);
        }
        applications.push(application.clone());
        Ok(application)
    }

    async fn update(&self, application: JobApplication) -> RepositoryResult<JobApplication> {
        let mut applications = self.applications.lock().unwrap();
        let slot = applications
            .iter_mut()
            .find(|a| a.id == application.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = application.clone();
        Ok(application)
    }

    async fn find_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<JobApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_job_and_freelancer(
        &self,
        job_id: JobId,
        freelancer_id: UserId,
    ) -> RepositoryResult<Option<JobApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.job_id == job_id && a.freelancer_id == freelancer_id)
            .cloned())
    }

    async fn list_by_job(&self, job_id: JobId) -> RepositoryResult<Vec<JobApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn list_by_freelancer(
        &self,
        freelancer_id: UserId,
    ) -> RepositoryResult<Vec<JobApplication>> {
        let mut applications: Vec<JobApplication> = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.freelancer_id == freelancer_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }
}

#[derive(Default)]
pub struct InMemoryMessages {
    messages: Mutex<Vec<Message>>,
    pub fail_creates: AtomicBool,
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
    async fn create(&self, message: Message) -> RepositoryResult<Message> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::storage("simulated write failure"));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list_between(&self, a: UserId, b: UserId) -> RepositoryResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b)
                    || (m.sender_id == b && m.recipient_id == a)
            })
            .cloned()
            .collect();
        messages.sort_by(|x, y| x.created_at.cmp(&y.created_at));
        Ok(messages)
    }

    async fn list_involving_desc(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|x, y| y.created_at.cmp(&x.created_at));
        Ok(messages)
    }
}

#[derive(Default)]
pub struct InMemoryNotifications {
    notifications: Mutex<Vec<Notification>>,
    pub fail_creates: AtomicBool,
}

impl InMemoryNotifications {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotifications {
    async fn create(&self, notification: Notification) -> RepositoryResult<Notification> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::storage("simulated write failure"));
        }
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn update(&self, notification: Notification) -> RepositoryResult<Notification> {
        let mut notifications = self.notifications.lock().unwrap();
        let slot = notifications
            .iter_mut()
            .find(|n| n.id == notification.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = notification.clone();
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn list_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> RepositoryResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}

pub fn notification_service(
    repository: Arc<InMemoryNotifications>,
    clock: Arc<dyn Clock>,
) -> Arc<NotificationService> {
    Arc::new(NotificationService::new(NotificationServiceDependencies {
        notification_repository: repository,
        clock,
    }))
}

pub fn user(name: &str, email: &str, role: UserRole) -> User {
    User::register(
        UserId::from(Uuid::new_v4()),
        DisplayName::parse(name).unwrap(),
        UserEmail::parse(email).unwrap(),
        PasswordHash::new("plain:secret").unwrap(),
        role,
        Some("Berlin".to_string()),
        vec!["plumbing".to_string()],
        Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap(),
    )
}

pub fn job_owned_by(client_id: UserId, title: &str) -> Job {
    Job::post(
        JobId::generate(),
        title.to_string(),
        "description".to_string(),
        "plumbing".to_string(),
        200,
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        "Berlin".to_string(),
        client_id,
        Utc.with_ymd_and_hms(2023, 12, 2, 0, 0, 0).unwrap(),
    )
    .unwrap()
}
