//! 通知服务单元测试：收件箱排序与已读标记。

use std::sync::Arc;

use domain::{DomainError, NotificationKind, UserRole};

use crate::services::test_support::*;
use crate::ApplicationError;

fn fixture() -> (Arc<crate::NotificationService>, Arc<InMemoryNotifications>) {
    let repository = Arc::new(InMemoryNotifications::default());
    let clock: Arc<dyn crate::Clock> = Arc::new(ManualClock::new());
    (notification_service(repository.clone(), clock), repository)
}

#[tokio::test]
async fn inbox_is_sorted_newest_first() {
    let (service, _) = fixture();
    let recipient = user("Anna", "anna@example.com", UserRole::Freelancer);
    let sender = user("Bob", "bob@example.com", UserRole::Client);

    for text in ["first", "second", "third"] {
        service
            .notify(
                recipient.id,
                sender.id,
                NotificationKind::NewMessage,
                text.to_string(),
                "/chat".to_string(),
            )
            .await
            .unwrap();
    }

    let inbox = service.list_for_user(recipient.id.into()).await.unwrap();
    let messages: Vec<&str> = inbox.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["third", "second", "first"]);
    assert!(inbox.iter().all(|n| !n.read));
}

#[tokio::test]
async fn mark_read_is_idempotent_for_the_recipient() {
    let (service, _) = fixture();
    let recipient = user("Anna", "anna@example.com", UserRole::Freelancer);
    let sender = user("Bob", "bob@example.com", UserRole::Client);

    let stored = service
        .notify(
            recipient.id,
            sender.id,
            NotificationKind::ApplicationAccepted,
            "accepted".to_string(),
            "/my-applications".to_string(),
        )
        .await
        .unwrap();

    let first = service
        .mark_read(stored.id.into(), recipient.id.into())
        .await
        .unwrap();
    assert!(first.read);

    let again = service
        .mark_read(stored.id.into(), recipient.id.into())
        .await
        .unwrap();
    assert!(again.read);
}

#[tokio::test]
async fn mark_read_requires_the_addressed_recipient() {
    let (service, _) = fixture();
    let recipient = user("Anna", "anna@example.com", UserRole::Freelancer);
    let sender = user("Bob", "bob@example.com", UserRole::Client);
    let intruder = user("Eve", "eve@example.com", UserRole::Client);

    let stored = service
        .notify(
            recipient.id,
            sender.id,
            NotificationKind::NewMessage,
            "private".to_string(),
            "/chat".to_string(),
        )
        .await
        .unwrap();

    let denied = service
        .mark_read(stored.id.into(), intruder.id.into())
        .await;
    assert!(matches!(
        denied,
        Err(ApplicationError::Domain(DomainError::NotOwner))
    ));

    let inbox = service.list_for_user(recipient.id.into()).await.unwrap();
    assert!(!inbox[0].read);
}
