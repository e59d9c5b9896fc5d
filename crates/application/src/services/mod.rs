mod application_service;
mod chat_service;
mod cover_letter_service;
mod job_service;
mod notification_service;
mod user_service;

#[cfg(test)]
mod notification_service_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use application_service::{
    ApplicationService, ApplicationServiceDependencies, ApplyRequest, DecideApplicationRequest,
};
pub use chat_service::{
    ChatService, ChatServiceDependencies, ConversationSummary, SendMessageRequest,
};
pub use cover_letter_service::{
    CoverLetterService, CoverLetterServiceDependencies, DraftCoverLetterRequest,
};
pub use job_service::{CreateJobRequest, JobService, JobServiceDependencies, UpdateJobRequest};
pub use notification_service::{NotificationService, NotificationServiceDependencies};
pub use user_service::{
    AuthenticateUserRequest, RegisterUserRequest, UpdateProfileRequest, UserService,
    UserServiceDependencies,
};
