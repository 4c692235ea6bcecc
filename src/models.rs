use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "site_manager")]
    pub username: String,
    #[schema(example = "hunter2")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "site_manager")]
    pub username: String,
    #[schema(example = "hunter2")]
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Full user row, password hash included. Never serialized.
#[derive(FromRow)]
pub struct UserSql {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Client-facing user row.
#[derive(Serialize, FromRow, ToSchema)]
pub struct UserInfo {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "site_manager")]
    pub username: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<UserSql> for UserInfo {
    fn from(user: UserSql) -> Self {
        UserInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            phone: user.phone,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
