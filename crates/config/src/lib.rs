//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 数据库连接
//! - JWT认证
//! - 服务设置
//! - 外部 AI 文本生成调用

use serde::{Deserialize, Serialize};
use std::env;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// JWT认证配置
    pub jwt: JwtConfig,
    /// 服务配置
    pub server: ServerConfig,
    /// AI 生成配置
    pub ai: AiConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub bcrypt_cost: Option<u32>,
}

/// AI 生成配置（求职信草稿）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// 缺失时 AI 路由返回配置错误，其余功能不受影响
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl AppConfig {
    /// 从环境变量加载配置
    /// 对于关键安全配置（DATABASE_URL, JWT_SECRET），如果环境变量不存在将会 panic
    /// 这确保了生产环境中不会使用不安全的默认值
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .expect("DATABASE_URL environment variable is required for production safety"),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")
                    .expect("JWT_SECRET environment variable is required for production safety"),
                expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(24),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                bcrypt_cost: env::var("BCRYPT_COST").ok().and_then(|s| s.parse().ok()),
            },
            ai: AiConfig {
                api_key: env::var("GEMINI_API_KEY").ok(),
                endpoint: env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            },
        }
    }
}
