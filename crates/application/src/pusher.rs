use async_trait::async_trait;
use domain::{Message, UserId};
use thiserror::Error;

/// 推送给客户端的实时事件。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage(Message),
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push failed: {0}")]
    Failed(String),
}

impl PushError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 连接注册表的投递端接口。
///
/// 实现按用户频道定向推送；没有在线连接时静默丢弃（至多一次投递），
/// 错过的消息由持久化的历史在下次连接时补齐。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn push(&self, recipient: UserId, event: ServerEvent) -> Result<(), PushError>;
}
