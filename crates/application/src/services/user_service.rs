use std::sync::Arc;

use domain::{
    DisplayName, DomainError, ProfileUpdate, RepositoryError, User, UserEmail, UserId, UserRole,
    UserRepository,
};
use uuid::Uuid;

use crate::{clock::Clock, error::ApplicationError, password::PasswordHasher};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub city: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub portfolio: Option<String>,
    pub profile_picture: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, ApplicationError> {
        let name = DisplayName::parse(request.name)?;
        let email = UserEmail::parse(request.email)?;

        if self
            .deps
            .user_repository
            .find_by_email(email.clone())
            .await?
            .is_some()
        {
            return Err(DomainError::UserAlreadyExists.into());
        }

        let password_hash = self.deps.password_hasher.hash(&request.password).await?;

        let now = self.deps.clock.now();
        let user = User::register(
            UserId::from(Uuid::new_v4()),
            name,
            email,
            password_hash,
            request.role,
            request.city,
            request.skills,
            now,
        );

        // 邮箱唯一索引兜住读后写窗口内的并发注册
        match self.deps.user_repository.create(user).await {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Err(DomainError::UserAlreadyExists.into()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn authenticate(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<User, ApplicationError> {
        let email = UserEmail::parse(request.email)?;
        let user = self
            .deps
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password)
            .await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ApplicationError> {
        self.deps
            .user_repository
            .find_by_id(UserId::from(user_id))
            .await?
            .ok_or_else(|| DomainError::UserNotFound.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<User, ApplicationError> {
        let mut user = self.get_user(user_id).await?;

        let password = match request.password {
            Some(plaintext) => Some(self.deps.password_hasher.hash(&plaintext).await?),
            None => None,
        };

        let update = ProfileUpdate {
            name: request.name.map(DisplayName::parse).transpose()?,
            email: request.email.map(UserEmail::parse).transpose()?,
            password,
            city: request.city,
            skills: request.skills,
            bio: request.bio,
            portfolio: request.portfolio,
            profile_picture: request.profile_picture,
            company_name: request.company_name,
            company_description: request.company_description,
        };

        let now = self.deps.clock.now();
        user.apply_update(update, now)?;

        let stored = self.deps.user_repository.update(user).await?;
        Ok(stored)
    }
}
