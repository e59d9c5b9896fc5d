//! PostgreSQL 仓储实现。
//!
//! 行记录类型与领域实体分离，经 TryFrom 转换；存储错误在这里统一
//! 映射为 RepositoryError。

use chrono::{DateTime, Utc};
use domain::{
    ApplicationId, ApplicationRepository, ApplicationStatus, DisplayName, Job, JobApplication,
    JobFilter, JobId, JobRepository, JobStatus, Message, MessageContent, MessageId,
    MessageRepository, Notification, NotificationId, NotificationKind, NotificationRepository,
    PasswordHash, RepositoryError, RepositoryResult, User, UserEmail, UserId, UserRepository,
    UserRole,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        _ => RepositoryError::storage(err.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

/// 构造 ILIKE 的包含模式。用户输入里的 %、_ 和转义符必须先转义，
/// 否则会被当作通配符（如搜索 "100%"）。
fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: UserRole,
    city: Option<String>,
    skills: Vec<String>,
    bio: Option<String>,
    portfolio: Option<String>,
    profile_picture: Option<String>,
    company_name: Option<String>,
    company_description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let name =
            DisplayName::parse(value.name).map_err(|err| invalid_data(err.to_string()))?;
        let email =
            UserEmail::parse(value.email).map_err(|err| invalid_data(err.to_string()))?;
        let password = PasswordHash::new(value.password_hash)
            .map_err(|err| invalid_data(err.to_string()))?;

        Ok(User {
            id: UserId::from(value.id),
            name,
            email,
            password,
            role: value.role,
            city: value.city,
            skills: value.skills,
            bio: value.bio,
            portfolio: value.portfolio,
            profile_picture: value.profile_picture,
            company_name: value.company_name,
            company_description: value.company_description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> RepositoryResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, role, city, skills, bio,
                 portfolio, profile_picture, company_name, company_description,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(Uuid::from(user.id))
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(user.role)
        .bind(&user.city)
        .bind(&user.skills)
        .bind(&user.bio)
        .bind(&user.portfolio)
        .bind(&user.profile_picture)
        .bind(&user.company_name)
        .bind(&user.company_description)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(user)
    }

    async fn update(&self, user: User) -> RepositoryResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, city = $5,
                skills = $6, bio = $7, portfolio = $8, profile_picture = $9,
                company_name = $10, company_description = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(user.id))
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(&user.city)
        .bind(&user.skills)
        .bind(&user.bio)
        .bind(&user.portfolio)
        .bind(&user.profile_picture)
        .bind(&user.company_name)
        .bind(&user.company_description)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        record.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: UserEmail) -> RepositoryResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        record.map(User::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct JobRecord {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    budget: i64,
    deadline: DateTime<Utc>,
    city: String,
    client_id: Uuid,
    status: JobStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<JobRecord> for Job {
    fn from(value: JobRecord) -> Self {
        Job {
            id: JobId::from(value.id),
            title: value.title,
            description: value.description,
            category: value.category,
            budget: value.budget,
            deadline: value.deadline,
            city: value.city,
            client_id: UserId::from(value.client_id),
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl JobRepository for PgJobRepository {
    async fn create(&self, job: Job) -> RepositoryResult<Job> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, description, category, budget, deadline, city, client_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(Uuid::from(job.id))
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(job.budget)
        .bind(job.deadline)
        .bind(&job.city)
        .bind(Uuid::from(job.client_id))
        .bind(job.status)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(job)
    }

    async fn update(&self, job: Job) -> RepositoryResult<Job> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, category = $4, budget = $5,
                deadline = $6, city = $7, status = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(job.id))
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(job.budget)
        .bind(job.deadline)
        .bind(&job.city)
        .bind(job.status)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(job)
    }

    async fn delete(&self, id: JobId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>> {
        let record = sqlx::query_as::<_, JobRecord>("SELECT * FROM jobs WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(record.map(Job::from))
    }

    async fn list(&self, filter: &JobFilter) -> RepositoryResult<Vec<Job>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM jobs WHERE TRUE");

        if let Some(search) = &filter.search {
            let pattern = contains_pattern(search);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if let Some(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }
        if let Some(city) = &filter.city {
            builder.push(" AND city ILIKE ");
            builder.push_bind(contains_pattern(city));
        }
        if let Some(min) = filter.min_budget {
            builder.push(" AND budget >= ");
            builder.push_bind(min);
        }
        if let Some(max) = filter.max_budget {
            builder.push(" AND budget <= ");
            builder.push_bind(max);
        }
        builder.push(" ORDER BY created_at DESC");

        let records = builder
            .build_query_as::<JobRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(records.into_iter().map(Job::from).collect())
    }

    async fn list_by_client(&self, client_id: UserId) -> RepositoryResult<Vec<Job>> {
        let records = sqlx::query_as::<_, JobRecord>(
            "SELECT * FROM jobs WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(Uuid::from(client_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(records.into_iter().map(Job::from).collect())
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRecord {
    id: Uuid,
    job_id: Uuid,
    freelancer_id: Uuid,
    cover_letter: String,
    resume: Option<String>,
    status: ApplicationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ApplicationRecord> for JobApplication {
    fn from(value: ApplicationRecord) -> Self {
        JobApplication {
            id: ApplicationId::from(value.id),
            job_id: JobId::from(value.job_id),
            freelancer_id: UserId::from(value.freelancer_id),
            cover_letter: value.cover_letter,
            resume: value.resume,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, application: JobApplication) -> RepositoryResult<JobApplication> {
        sqlx::query(
            r#"
            INSERT INTO applications
                (id, job_id, freelancer_id, cover_letter, resume, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(application.id))
        .bind(Uuid::from(application.job_id))
        .bind(Uuid::from(application.freelancer_id))
        .bind(&application.cover_letter)
        .bind(&application.resume)
        .bind(application.status)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(application)
    }

    async fn update(&self, application: JobApplication) -> RepositoryResult<JobApplication> {
        let result = sqlx::query(
            "UPDATE applications SET status = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(Uuid::from(application.id))
        .bind(application.status)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(application)
    }

    async fn find_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<JobApplication>> {
        let record =
            sqlx::query_as::<_, ApplicationRecord>("SELECT * FROM applications WHERE id = $1")
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        Ok(record.map(JobApplication::from))
    }

    async fn find_by_job_and_freelancer(
        &self,
        job_id: JobId,
        freelancer_id: UserId,
    ) -> RepositoryResult<Option<JobApplication>> {
        let record = sqlx::query_as::<_, ApplicationRecord>(
            "SELECT * FROM applications WHERE job_id = $1 AND freelancer_id = $2",
        )
        .bind(Uuid::from(job_id))
        .bind(Uuid::from(freelancer_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(record.map(JobApplication::from))
    }

    async fn list_by_job(&self, job_id: JobId) -> RepositoryResult<Vec<JobApplication>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at ASC",
        )
        .bind(Uuid::from(job_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(records.into_iter().map(JobApplication::from).collect())
    }

    async fn list_by_freelancer(
        &self,
        freelancer_id: UserId,
    ) -> RepositoryResult<Vec<JobApplication>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            "SELECT * FROM applications WHERE freelancer_id = $1 ORDER BY created_at DESC",
        )
        .bind(Uuid::from(freelancer_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(records.into_iter().map(JobApplication::from).collect())
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: Uuid,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let content =
            MessageContent::parse(value.content).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Message {
            id: MessageId::from(value.id),
            sender_id: UserId::from(value.sender_id),
            recipient_id: UserId::from(value.recipient_id),
            content,
            created_at: value.created_at,
        })
    }
}

pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: Message) -> RepositoryResult<Message> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::from(message.id))
        .bind(Uuid::from(message.sender_id))
        .bind(Uuid::from(message.recipient_id))
        .bind(message.content.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>("SELECT * FROM messages WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        record.map(Message::try_from).transpose()
    }

    async fn list_between(&self, a: UserId, b: UserId) -> RepositoryResult<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(Uuid::from(a))
        .bind(Uuid::from(b))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        records.into_iter().map(Message::try_from).collect()
    }

    async fn list_involving_desc(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE sender_id = $1 OR recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(Uuid::from(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        records.into_iter().map(Message::try_from).collect()
    }
}

#[derive(Debug, FromRow)]
struct NotificationRecord {
    id: Uuid,
    recipient_id: Uuid,
    sender_id: Uuid,
    kind: NotificationKind,
    message: String,
    link: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRecord> for Notification {
    fn from(value: NotificationRecord) -> Self {
        Notification {
            id: NotificationId::from(value.id),
            recipient_id: UserId::from(value.recipient_id),
            sender_id: UserId::from(value.sender_id),
            kind: value.kind,
            message: value.message,
            link: value.link,
            read: value.read,
            created_at: value.created_at,
        }
    }
}

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: Notification) -> RepositoryResult<Notification> {
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, recipient_id, sender_id, kind, message, link, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(notification.id))
        .bind(Uuid::from(notification.recipient_id))
        .bind(Uuid::from(notification.sender_id))
        .bind(notification.kind)
        .bind(&notification.message)
        .bind(&notification.link)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(notification)
    }

    async fn update(&self, notification: Notification) -> RepositoryResult<Notification> {
        let result = sqlx::query("UPDATE notifications SET read = $2 WHERE id = $1")
            .bind(Uuid::from(notification.id))
            .bind(notification.read)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>> {
        let record =
            sqlx::query_as::<_, NotificationRecord>("SELECT * FROM notifications WHERE id = $1")
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        Ok(record.map(Notification::from))
    }

    async fn list_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> RepositoryResult<Vec<Notification>> {
        let records = sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE recipient_id = $1 ORDER BY created_at DESC",
        )
        .bind(Uuid::from(recipient_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(records.into_iter().map(Notification::from).collect())
    }
}
