//! 基础设施层实现。
//!
//! 提供数据库仓储、密码哈希、连接注册表、外部 AI 客户端等适配器，
//! 实现应用/领域层定义的接口。

pub mod ai;
pub mod migrations;
pub mod password;
pub mod registry;
pub mod repository;

pub use ai::GeminiCoverLetterGenerator;
pub use migrations::MIGRATOR;
pub use password::BcryptPasswordHasher;
pub use registry::ConnectionRegistry;
pub use repository::{
    create_pg_pool, PgApplicationRepository, PgJobRepository, PgMessageRepository,
    PgNotificationRepository, PgUserRepository,
};
