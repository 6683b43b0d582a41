//! Request/response DTOs and mapping to/from domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use userauth_auth::{NewUser, UserPatch};
use userauth_core::{LoginRecord, Role, User};

/// Outward user representation. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub uuid: Uuid,
    pub role: Role,
    pub username: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            uuid: *user.id.as_uuid(),
            role: user.role,
            username: user.username,
            email: user.email,
            name: user.name,
            surname: user.surname,
        }
    }
}

impl From<UserDto> for UserPatch {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.uuid.into(),
            role: dto.role,
            username: dto.username,
            email: dto.email,
            name: dto.name,
            surname: dto.surname,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRecordDto {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub login_time: chrono::DateTime<chrono::Utc>,
}

impl From<LoginRecord> for LoginRecordDto {
    fn from(record: LoginRecord) -> Self {
        Self {
            uuid: *record.id.as_uuid(),
            user_uuid: *record.user_id.as_uuid(),
            login_time: record.ctime,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            email: req.email,
            name: req.name,
            surname: req.surname,
        }
    }
}

/// `POST /token` form body (username/password login).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /token` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPackage {
    pub access_token: String,
    pub token_type: String,
}

impl TokenPackage {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
