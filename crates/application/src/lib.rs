//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、授权守卫、
//! 以及对外部适配器（密码哈希、实时推送、AI 文本生成）的抽象。

pub mod clock;
pub mod error;
pub mod generator;
pub mod password;
pub mod pusher;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use generator::{CoverLetterGenerator, CoverLetterRequest, GeneratorError};
pub use password::{PasswordHasher, PasswordHasherError};
pub use pusher::{MessagePusher, PushError, ServerEvent};
pub use services::{
    ApplicationService, ApplicationServiceDependencies, ApplyRequest, AuthenticateUserRequest,
    ChatService, ChatServiceDependencies, ConversationSummary, CoverLetterService,
    CoverLetterServiceDependencies, CreateJobRequest, DecideApplicationRequest,
    DraftCoverLetterRequest, JobService, JobServiceDependencies, NotificationService,
    NotificationServiceDependencies, RegisterUserRequest, SendMessageRequest,
    UpdateJobRequest, UpdateProfileRequest, UserService, UserServiceDependencies,
};
