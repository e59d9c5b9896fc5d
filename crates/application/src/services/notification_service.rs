use std::sync::Arc;

use domain::{
    ensure_owner, DomainError, Notification, NotificationId, NotificationKind,
    NotificationRepository, UserId,
};
use uuid::Uuid;

use crate::{clock::Clock, error::ApplicationError};

pub struct NotificationServiceDependencies {
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub clock: Arc<dyn Clock>,
}

/// 通知扇出：把领域事件派生为持久化通知，并提供收件箱读取。
pub struct NotificationService {
    deps: NotificationServiceDependencies,
}

impl NotificationService {
    pub fn new(deps: NotificationServiceDependencies) -> Self {
        Self { deps }
    }

    /// 写入一条未读通知。调用方决定失败是否致命；
    /// 触发事件的路径上必须把失败当作非致命并仅记录日志。
    pub async fn notify(
        &self,
        recipient_id: UserId,
        sender_id: UserId,
        kind: NotificationKind,
        message: String,
        link: String,
    ) -> Result<Notification, ApplicationError> {
        let notification = Notification::new(
            NotificationId::generate(),
            recipient_id,
            sender_id,
            kind,
            message,
            link,
            self.deps.clock.now(),
        );
        let stored = self
            .deps
            .notification_repository
            .create(notification)
            .await?;
        Ok(stored)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, ApplicationError> {
        let notifications = self
            .deps
            .notification_repository
            .list_by_recipient(UserId::from(user_id))
            .await?;
        Ok(notifications)
    }

    /// 幂等地把通知置为已读。只有收件人本人可以操作。
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        caller: Uuid,
    ) -> Result<Notification, ApplicationError> {
        let mut notification = self
            .deps
            .notification_repository
            .find_by_id(NotificationId::from(notification_id))
            .await?
            .ok_or(DomainError::NotificationNotFound)?;

        ensure_owner(notification.recipient_id, UserId::from(caller))?;

        notification.mark_read();
        let stored = self
            .deps
            .notification_repository
            .update(notification)
            .await?;
        Ok(stored)
    }
}
