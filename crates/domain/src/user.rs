use crate::errors::DomainError;
use crate::value_objects::{DisplayName, PasswordHash, Timestamp, UserEmail, UserId};

/// 用户角色。注册时确定，之后不可变更。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Freelancer,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: UserEmail,
    #[serde(skip_serializing)] // 密码字段不暴露给客户端
    pub password: PasswordHash,
    pub role: UserRole,
    pub city: Option<String>,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    /// 作品集链接，自由职业者专属。
    pub portfolio: Option<String>,
    /// 头像的不透明引用（URL 或存储键）；上传机制不在这里。
    pub profile_picture: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// 资料更新入参；None 表示保留原值。
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<DisplayName>,
    pub email: Option<UserEmail>,
    pub password: Option<PasswordHash>,
    pub city: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub portfolio: Option<String>,
    pub profile_picture: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        id: UserId,
        name: DisplayName,
        email: UserEmail,
        password: PasswordHash,
        role: UserRole,
        city: Option<String>,
        skills: Vec<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            role,
            city,
            // 技能栏只对自由职业者有意义，公司名只对客户有意义
            skills: match role {
                UserRole::Freelancer => skills,
                UserRole::Client => Vec::new(),
            },
            bio: None,
            portfolio: None,
            profile_picture: None,
            company_name: None,
            company_description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 应用资料更新。角色相关字段仅对对应角色生效。
    pub fn apply_update(&mut self, update: ProfileUpdate, now: Timestamp) -> Result<(), DomainError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(city) = update.city {
            self.city = Some(city);
        }
        if let Some(profile_picture) = update.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
        match self.role {
            UserRole::Freelancer => {
                if let Some(skills) = update.skills {
                    self.skills = skills;
                }
                if let Some(bio) = update.bio {
                    self.bio = Some(bio);
                }
                if let Some(portfolio) = update.portfolio {
                    self.portfolio = Some(portfolio);
                }
            }
            UserRole::Client => {
                if let Some(company_name) = update.company_name {
                    self.company_name = Some(company_name);
                }
                if let Some(company_description) = update.company_description {
                    self.company_description = Some(company_description);
                }
            }
        }
        self.updated_at = now;
        Ok(())
    }
}
