//! 本地服务接单平台核心领域模型
//!
//! 包含用户、职位、申请、消息、通知等核心实体，以及相关的业务规则。

pub mod errors;
pub mod job;
pub mod job_application;
pub mod message;
pub mod notification;
pub mod ownership;
pub mod repository;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use errors::{DomainError, RepositoryError};
pub use job::{Job, JobFilter, JobStatus, JobUpdate};
pub use job_application::{ApplicationStatus, JobApplication};
pub use message::Message;
pub use notification::{Notification, NotificationKind};
pub use ownership::ensure_owner;
pub use repository::{
    ApplicationRepository, JobRepository, MessageRepository, NotificationRepository,
    RepositoryResult, UserRepository,
};
pub use user::{ProfileUpdate, User, UserRole};
pub use value_objects::{
    ApplicationId, DisplayName, JobId, MessageContent, MessageId, NotificationId, PasswordHash,
    Timestamp, UserEmail, UserId,
};
