use crate::value_objects::{NotificationId, Timestamp, UserId};

/// 通知类型。每个值对应一个触发它的领域事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    ApplicationAccepted,
    ApplicationRejected,
    NewMessage,
}

/// 由领域事件派生的持久化通知。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub sender_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub link: String,
    pub read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        recipient_id: UserId,
        sender_id: UserId,
        kind: NotificationKind,
        message: String,
        link: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            recipient_id,
            sender_id,
            kind,
            message,
            link,
            read: false,
            created_at,
        }
    }

    /// 幂等：已读通知再标记仍为已读。
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_notification_is_unread_and_mark_read_is_idempotent() {
        let mut notification = Notification::new(
            NotificationId::generate(),
            UserId::generate(),
            UserId::generate(),
            NotificationKind::NewMessage,
            "Anna sent you a new message".to_string(),
            "/chat".to_string(),
            Utc::now(),
        );
        assert!(!notification.read);

        notification.mark_read();
        notification.mark_read();
        assert!(notification.read);
    }

    #[test]
    fn kind_serializes_as_snake_case_tag() {
        let json = serde_json::to_string(&NotificationKind::ApplicationReceived).unwrap();
        assert_eq!(json, "\"application_received\"");
    }
}
