use std::sync::Arc;

use application::{
    ApplicationService, ChatService, CoverLetterService, JobService, NotificationService,
    UserService,
};
use infrastructure::ConnectionRegistry;

use crate::auth::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub job_service: Arc<JobService>,
    pub application_service: Arc<ApplicationService>,
    pub chat_service: Arc<ChatService>,
    pub notification_service: Arc<NotificationService>,
    pub cover_letter_service: Arc<CoverLetterService>,
    pub registry: Arc<ConnectionRegistry>,
    pub jwt_service: Arc<JwtService>,
}
