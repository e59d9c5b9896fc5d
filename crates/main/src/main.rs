//! 主应用程序入口
//!
//! 装配仓储、服务与路由，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    ApplicationService, ApplicationServiceDependencies, ChatService, ChatServiceDependencies,
    CoverLetterService, CoverLetterServiceDependencies, JobService, JobServiceDependencies,
    NotificationService, NotificationServiceDependencies, SystemClock, UserService,
    UserServiceDependencies,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, ConnectionRegistry, GeminiCoverLetterGenerator,
    PgApplicationRepository, PgJobRepository, PgMessageRepository, PgNotificationRepository,
    PgUserRepository, MIGRATOR,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );
    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    MIGRATOR.run(&pg_pool).await?;

    let user_repository = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let job_repository = Arc::new(PgJobRepository::new(pg_pool.clone()));
    let application_repository = Arc::new(PgApplicationRepository::new(pg_pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pg_pool.clone()));
    let notification_repository = Arc::new(PgNotificationRepository::new(pg_pool));

    let password_hasher: Arc<dyn application::PasswordHasher> =
        Arc::new(BcryptPasswordHasher::new(config.server.bcrypt_cost));
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);
    let registry = Arc::new(ConnectionRegistry::new());
    let generator: Arc<dyn application::CoverLetterGenerator> =
        Arc::new(GeminiCoverLetterGenerator::new(config.ai.clone()));

    let notification_service = Arc::new(NotificationService::new(NotificationServiceDependencies {
        notification_repository,
        clock: clock.clone(),
    }));

    let user_service = Arc::new(UserService::new(UserServiceDependencies {
        user_repository: user_repository.clone(),
        password_hasher,
        clock: clock.clone(),
    }));

    let job_service = Arc::new(JobService::new(JobServiceDependencies {
        job_repository: job_repository.clone(),
        user_repository: user_repository.clone(),
        clock: clock.clone(),
    }));

    let application_service = Arc::new(ApplicationService::new(ApplicationServiceDependencies {
        application_repository,
        job_repository: job_repository.clone(),
        user_repository: user_repository.clone(),
        notifications: notification_service.clone(),
        clock: clock.clone(),
    }));

    let chat_service = Arc::new(ChatService::new(ChatServiceDependencies {
        message_repository,
        user_repository: user_repository.clone(),
        pusher: registry.clone(),
        notifications: notification_service.clone(),
        clock,
    }));

    let cover_letter_service = Arc::new(CoverLetterService::new(CoverLetterServiceDependencies {
        job_repository,
        user_repository,
        generator,
    }));

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState {
        user_service,
        job_service,
        application_service,
        chat_service,
        notification_service,
        cover_letter_service,
        registry,
        jwt_service,
    };

    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
