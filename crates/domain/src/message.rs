use crate::value_objects::{MessageContent, MessageId, Timestamp, UserId};

/// 两方之间的一条定向聊天消息。创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(
        id: MessageId,
        sender_id: UserId,
        recipient_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_id,
            recipient_id,
            content,
            created_at,
        }
    }

    /// 返回对话中的另一方；消息不属于该用户时返回 None。
    pub fn counterpart_of(&self, user_id: UserId) -> Option<UserId> {
        if self.sender_id == user_id {
            Some(self.recipient_id)
        } else if self.recipient_id == user_id {
            Some(self.sender_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn counterpart_resolves_both_directions() {
        let sender = UserId::generate();
        let recipient = UserId::generate();
        let message = Message::new(
            MessageId::generate(),
            sender,
            recipient,
            MessageContent::parse("hi").unwrap(),
            Utc::now(),
        );

        assert_eq!(message.counterpart_of(sender), Some(recipient));
        assert_eq!(message.counterpart_of(recipient), Some(sender));
        assert_eq!(message.counterpart_of(UserId::generate()), None);
    }
}
