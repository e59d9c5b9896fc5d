//! REST 路由与处理器。处理器保持薄：鉴权、反序列化、调用服务、映射响应。

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use application::{
    ApplyRequest, AuthenticateUserRequest, ConversationSummary, CreateJobRequest,
    DecideApplicationRequest, DraftCoverLetterRequest, RegisterUserRequest, UpdateJobRequest,
    UpdateProfileRequest,
};
use domain::{
    ApplicationStatus, Job, JobApplication, JobFilter, JobStatus, Message, Notification,
    Timestamp, User, UserRole,
};

use crate::{auth::AuthResponse, error::ApiError, state::AppState, websocket};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", put(update_profile))
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/my-jobs", get(my_jobs))
        .route("/jobs/{id}", get(get_job).put(update_job).delete(delete_job))
        .route("/applications", post(apply))
        .route("/applications/job/{job_id}", get(list_applications_for_job))
        .route("/applications/my-applications", get(my_applications))
        .route("/applications/{id}/status", put(decide_application))
        .route("/chat/conversations", get(get_conversations))
        .route("/chat/{user_id}", get(get_history))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", put(mark_notification_read))
        .route("/ai/cover-letter", post(draft_cover_letter))
        .route("/ws", get(websocket::websocket_upgrade))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct RegisterPayload {
    name: String,
    email: String,
    password: String,
    role: UserRole,
    city: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            city: payload.city,
            skills: payload.skills,
        })
        .await?;

    let token = state.jwt_service.generate_token(user.id.into())?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(AuthenticateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.jwt_service.generate_token(user.id.into())?;
    Ok(Json(AuthResponse { user, token }))
}

#[derive(Debug, Deserialize)]
struct UpdateProfilePayload {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    city: Option<String>,
    skills: Option<Vec<String>>,
    bio: Option<String>,
    portfolio: Option<String>,
    profile_picture: Option<String>,
    company_name: Option<String>,
    company_description: Option<String>,
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<User>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let user = state
        .user_service
        .update_profile(
            caller,
            UpdateProfileRequest {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                city: payload.city,
                skills: payload.skills,
                bio: payload.bio,
                portfolio: payload.portfolio,
                profile_picture: payload.profile_picture,
                company_name: payload.company_name,
                company_description: payload.company_description,
            },
        )
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
struct CreateJobPayload {
    title: String,
    description: String,
    category: String,
    budget: i64,
    deadline: Timestamp,
    city: String,
}

async fn create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateJobPayload>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let job = state
        .job_service
        .create_job(CreateJobRequest {
            client_id: caller,
            title: payload.title,
            description: payload.description,
            category: payload.category,
            budget: payload.budget,
            deadline: payload.deadline,
            city: payload.city,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, Deserialize)]
struct JobsQuery {
    search: Option<String>,
    category: Option<String>,
    city: Option<String>,
    min_budget: Option<i64>,
    max_budget: Option<i64>,
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = state
        .job_service
        .list_jobs(JobFilter {
            search: query.search,
            category: query.category,
            city: query.city,
            min_budget: query.min_budget,
            max_budget: query.max_budget,
        })
        .await?;
    Ok(Json(jobs))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let job = state.job_service.get_job(id).await?;
    Ok(Json(job))
}

async fn my_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Job>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let jobs = state.job_service.my_jobs(caller).await?;
    Ok(Json(jobs))
}

#[derive(Debug, Deserialize)]
struct UpdateJobPayload {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    budget: Option<i64>,
    deadline: Option<Timestamp>,
    city: Option<String>,
    status: Option<JobStatus>,
}

async fn update_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<Json<Job>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let job = state
        .job_service
        .update_job(
            id,
            caller,
            UpdateJobRequest {
                title: payload.title,
                description: payload.description,
                category: payload.category,
                budget: payload.budget,
                deadline: payload.deadline,
                city: payload.city,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(job))
}

async fn delete_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    state.job_service.delete_job(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ApplyPayload {
    job_id: Uuid,
    cover_letter: String,
    resume: Option<String>,
}

async fn apply(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ApplyPayload>,
) -> Result<(StatusCode, Json<JobApplication>), ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let application = state
        .application_service
        .apply(ApplyRequest {
            job_id: payload.job_id,
            freelancer_id: caller,
            cover_letter: payload.cover_letter,
            resume: payload.resume,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn list_applications_for_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobApplication>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let applications = state
        .application_service
        .list_for_job(job_id, caller)
        .await?;
    Ok(Json(applications))
}

async fn my_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<JobApplication>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let applications = state.application_service.my_applications(caller).await?;
    Ok(Json(applications))
}

#[derive(Debug, Deserialize)]
struct DecisionPayload {
    status: ApplicationStatus,
}

async fn decide_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionPayload>,
) -> Result<Json<JobApplication>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let application = state
        .application_service
        .decide(DecideApplicationRequest {
            application_id: id,
            caller,
            status: payload.status,
        })
        .await?;
    Ok(Json(application))
}

async fn get_conversations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let conversations = state.chat_service.get_conversations(caller).await?;
    Ok(Json(conversations))
}

async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let messages = state.chat_service.get_history(caller, user_id).await?;
    Ok(Json(messages))
}

async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let notifications = state.notification_service.list_for_user(caller).await?;
    Ok(Json(notifications))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let notification = state.notification_service.mark_read(id, caller).await?;
    Ok(Json(notification))
}

#[derive(Debug, Deserialize)]
struct CoverLetterPayload {
    job_id: Uuid,
}

async fn draft_cover_letter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CoverLetterPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = state.jwt_service.extract_user_from_headers(&headers)?;
    let draft = state
        .cover_letter_service
        .draft(DraftCoverLetterRequest {
            job_id: payload.job_id,
            freelancer_id: caller,
        })
        .await?;
    Ok(Json(serde_json::json!({ "cover_letter": draft })))
}
