//! Web API 层。
//!
//! 提供 REST 路由、WebSocket 升级、JWT 认证与统一错误响应。

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

pub use auth::{AuthResponse, Claims, JwtService};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
