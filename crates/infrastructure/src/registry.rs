//! 进程内连接注册表。
//!
//! 把用户标识映射到零或多个在线连接（同一用户的多个浏览器标签页各占一个）。
//! 纯内存路由状态，进程生命周期内有效；没有在线连接时推送被静默丢弃，
//! 错过的消息由持久化历史在下次连接时补齐。

use std::collections::HashMap;

use application::{MessagePusher, PushError, ServerEvent};
use async_trait::async_trait;
use domain::UserId;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

type ChannelMap = HashMap<UserId, HashMap<Uuid, mpsc::UnboundedSender<ServerEvent>>>;

#[derive(Default)]
pub struct ConnectionRegistry {
    channels: RwLock<ChannelMap>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把连接挂到用户频道上。按连接ID幂等：重复 join 只保留一个发送端。
    pub async fn join(
        &self,
        user_id: UserId,
        connection_id: Uuid,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_default()
            .insert(connection_id, sender);
        tracing::debug!(user_id = %user_id, connection_id = %connection_id, "connection joined channel");
    }

    /// 断开时把连接从它加入过的所有频道移除；调用方无需显式退订。
    pub async fn leave(&self, connection_id: Uuid) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, connections| {
            connections.remove(&connection_id);
            !connections.is_empty()
        });
        tracing::debug!(connection_id = %connection_id, "connection pruned from channels");
    }

    pub async fn connection_count(&self, user_id: UserId) -> usize {
        self.channels
            .read()
            .await
            .get(&user_id)
            .map(|connections| connections.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessagePusher for ConnectionRegistry {
    /// 至多一次投递：发送端已关闭或频道为空时不报错。
    async fn push(&self, recipient: UserId, event: ServerEvent) -> Result<(), PushError> {
        let channels = self.channels.read().await;
        if let Some(connections) = channels.get(&recipient) {
            for sender in connections.values() {
                // 接收端已掉线时丢弃；清理交给 leave
                let _ = sender.send(event.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{Message, MessageContent, MessageId};

    fn event(recipient: UserId) -> ServerEvent {
        ServerEvent::ReceiveMessage(Message::new(
            MessageId::generate(),
            UserId::generate(),
            recipient,
            MessageContent::parse("hi").unwrap(),
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn join_is_idempotent_per_connection() {
        let registry = ConnectionRegistry::new();
        let user = UserId::generate();
        let connection = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry.join(user, connection, tx.clone()).await;
        registry.join(user, connection, tx).await;
        assert_eq!(registry.connection_count(user).await, 1);

        registry.push(user, event(user)).await.unwrap();
        assert!(rx.recv().await.is_some());
        // 重复 join 不会造成重复投递
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_connection_of_a_user_receives_the_push() {
        let registry = ConnectionRegistry::new();
        let user = UserId::generate();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.join(user, Uuid::new_v4(), tx1).await;
        registry.join(user, Uuid::new_v4(), tx2).await;

        registry.push(user, event(user)).await.unwrap();
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn push_to_offline_user_is_silently_dropped() {
        let registry = ConnectionRegistry::new();
        let user = UserId::generate();
        assert!(registry.push(user, event(user)).await.is_ok());
    }

    #[tokio::test]
    async fn leave_prunes_the_connection_from_all_channels() {
        let registry = ConnectionRegistry::new();
        let user = UserId::generate();
        let connection = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        registry.join(user, connection, tx).await;
        registry.leave(connection).await;
        assert_eq!(registry.connection_count(user).await, 0);

        registry.push(user, event(user)).await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
