use async_trait::async_trait;

use crate::errors::RepositoryError;
use crate::job::{Job, JobFilter};
use crate::job_application::JobApplication;
use crate::message::Message;
use crate::notification::Notification;
use crate::user::User;
use crate::value_objects::{ApplicationId, JobId, MessageId, NotificationId, UserEmail, UserId};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> RepositoryResult<User>;
    async fn update(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: UserEmail) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: Job) -> RepositoryResult<Job>;
    async fn update(&self, job: Job) -> RepositoryResult<Job>;
    async fn delete(&self, id: JobId) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>>;
    /// 按创建时间倒序返回满足筛选条件的职位。
    async fn list(&self, filter: &JobFilter) -> RepositoryResult<Vec<Job>>;
    async fn list_by_client(&self, client_id: UserId) -> RepositoryResult<Vec<Job>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, application: JobApplication) -> RepositoryResult<JobApplication>;
    async fn update(&self, application: JobApplication) -> RepositoryResult<JobApplication>;
    async fn find_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<JobApplication>>;
    async fn find_by_job_and_freelancer(
        &self,
        job_id: JobId,
        freelancer_id: UserId,
    ) -> RepositoryResult<Option<JobApplication>>;
    async fn list_by_job(&self, job_id: JobId) -> RepositoryResult<Vec<JobApplication>>;
    /// 按创建时间倒序。
    async fn list_by_freelancer(
        &self,
        freelancer_id: UserId,
    ) -> RepositoryResult<Vec<JobApplication>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> RepositoryResult<Message>;
    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;
    /// 两方之间的全部消息，按创建时间升序。
    async fn list_between(&self, a: UserId, b: UserId) -> RepositoryResult<Vec<Message>>;
    /// 某用户参与的全部消息，按创建时间倒序（用于会话摘要扫描）。
    async fn list_involving_desc(&self, user_id: UserId) -> RepositoryResult<Vec<Message>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> RepositoryResult<Notification>;
    async fn update(&self, notification: Notification) -> RepositoryResult<Notification>;
    async fn find_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>>;
    /// 投递给某用户的全部通知，按创建时间倒序。
    async fn list_by_recipient(&self, recipient_id: UserId) -> RepositoryResult<Vec<Notification>>;
}
