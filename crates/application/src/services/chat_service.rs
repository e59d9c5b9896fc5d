use std::collections::HashSet;
use std::sync::Arc;

use domain::{
    Message, MessageContent, MessageId, MessageRepository, NotificationKind, Timestamp, UserId,
    UserRepository,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    error::ApplicationError,
    pusher::{MessagePusher, ServerEvent},
    services::notification_service::NotificationService,
};

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
}

/// 收件箱里的一行：某个对话方及其最近一条消息。
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConversationSummary {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub last_message: String,
    pub date: Timestamp,
}

pub struct ChatServiceDependencies {
    pub message_repository: Arc<dyn MessageRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub pusher: Arc<dyn MessagePusher>,
    pub notifications: Arc<NotificationService>,
    pub clock: Arc<dyn Clock>,
}

/// 消息中继：一条聊天消息的权威路径——校验、持久化、投递、通知。
pub struct ChatService {
    deps: ChatServiceDependencies,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies) -> Self {
        Self { deps }
    }

    /// 持久化失败时整个操作中止，不投递也不产生通知。
    /// 投递与通知都是尽力而为：失败只记日志，消息本身已经成功。
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<Message, ApplicationError> {
        let content = MessageContent::parse(request.content)?;
        let sender_id = UserId::from(request.sender_id);
        let recipient_id = UserId::from(request.recipient_id);

        let message = Message::new(
            MessageId::generate(),
            sender_id,
            recipient_id,
            content,
            self.deps.clock.now(),
        );
        let stored = self.deps.message_repository.create(message).await?;

        // 双向投递：收件人的频道和发送者自己的频道（发送者的其它连接
        // 不需要读己写即可看到这条消息）
        for target in [stored.recipient_id, stored.sender_id] {
            if let Err(err) = self
                .deps
                .pusher
                .push(target, ServerEvent::ReceiveMessage(stored.clone()))
                .await
            {
                tracing::warn!(target = %target, error = %err, "realtime push failed");
            }
        }

        self.fan_out_new_message(&stored).await;

        Ok(stored)
    }

    /// new_message 通知；发送者查询失败时整步跳过。
    async fn fan_out_new_message(&self, message: &Message) {
        let sender = match self
            .deps
            .user_repository
            .find_by_id(message.sender_id)
            .await
        {
            Ok(Some(sender)) => sender,
            Ok(None) => {
                tracing::warn!(sender_id = %message.sender_id, "sender vanished, skipping notification");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "sender lookup failed, skipping notification");
                return;
            }
        };

        let result = self
            .deps
            .notifications
            .notify(
                message.recipient_id,
                message.sender_id,
                NotificationKind::NewMessage,
                format!("{} sent you a new message", sender.name),
                format!("/chat/{}", message.sender_id),
            )
            .await;
        if let Err(err) = result {
            tracing::warn!(error = %err, "notification fan-out failed");
        }
    }

    /// 两方之间的完整历史，按创建时间升序。
    pub async fn get_history(
        &self,
        me: Uuid,
        other: Uuid,
    ) -> Result<Vec<Message>, ApplicationError> {
        let messages = self
            .deps
            .message_repository
            .list_between(UserId::from(me), UserId::from(other))
            .await?;
        Ok(messages)
    }

    /// 每个对话方只保留最近一条消息：对倒序消息流做一次扫描，
    /// 首次见到的对话方即是最新的（先见者胜）。
    pub async fn get_conversations(
        &self,
        me: Uuid,
    ) -> Result<Vec<ConversationSummary>, ApplicationError> {
        let me = UserId::from(me);
        let messages = self
            .deps
            .message_repository
            .list_involving_desc(me)
            .await?;

        let mut seen: HashSet<UserId> = HashSet::new();
        let mut conversations = Vec::new();

        for message in messages {
            let Some(counterpart_id) = message.counterpart_of(me) else {
                continue;
            };
            if !seen.insert(counterpart_id) {
                continue;
            }
            // 对话方已被删除时跳过该会话
            let Some(counterpart) = self
                .deps
                .user_repository
                .find_by_id(counterpart_id)
                .await?
            else {
                continue;
            };
            conversations.push(ConversationSummary {
                user_id: counterpart_id,
                name: counterpart.name.to_string(),
                email: counterpart.email.to_string(),
                last_message: message.content.as_str().to_string(),
                date: message.created_at,
            });
        }

        Ok(conversations)
    }
}
