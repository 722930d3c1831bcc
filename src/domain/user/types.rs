use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authentication::Credentials;
use crate::domain::{NewUser, UserName, UserPassword};

#[derive(Deserialize)]
pub struct LoginData {
    username: String,
    password: Secret<String>,
}

impl TryFrom<LoginData> for Credentials {
    type Error = String;

    fn try_from(payload: LoginData) -> Result<Self, Self::Error> {
        let username = UserName::parse(payload.username)?;
        let password = UserPassword::parse(payload.password.expose_secret().to_string())?;

        Ok(Credentials {
            username: username.as_ref().to_string(),
            password: password.into_secret(),
        })
    }
}

#[derive(Deserialize)]
pub struct RegisterData {
    email: String,
    username: String,
    password: Secret<String>,
    display_name: Option<String>,
}

impl TryFrom<RegisterData> for NewUser {
    type Error = String;

    fn try_from(payload: RegisterData) -> Result<Self, Self::Error> {
        NewUser::new(
            payload.email,
            payload.username,
            payload.password.expose_secret().to_string(),
            payload.display_name,
        )
    }
}

#[derive(Deserialize)]
pub struct ChangePasswordData {
    pub current_password: Secret<String>,
    pub new_password: Secret<String>,
}

/// Compact user projection used by search results and follow listings.
#[derive(Serialize, Debug)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(sqlx::FromRow, Debug)]
pub struct UserSearchRecord {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UserSearchRecord> for UserSummary {
    fn from(record: UserSearchRecord) -> Self {
        Self {
            id: record.id,
            display_name: record
                .display_name
                .unwrap_or_else(|| record.username.clone()),
            username: record.username,
            avatar_url: record.avatar_url,
        }
    }
}

/// Follow-listing row; `followed_at` carries the sort key for its cursor.
#[derive(sqlx::FromRow, Debug)]
pub struct FollowerRecord {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub followed_at: DateTime<Utc>,
}

impl From<FollowerRecord> for UserSummary {
    fn from(record: FollowerRecord) -> Self {
        Self {
            id: record.id,
            display_name: record
                .display_name
                .unwrap_or_else(|| record.username.clone()),
            username: record.username,
            avatar_url: record.avatar_url,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct ProfileResponseBody {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub follower_count: i64,
    pub following_count: i64,
}

impl ProfileResponseBody {
    pub fn from_parts(record: ProfileRecord, follower_count: i64, following_count: i64) -> Self {
        Self {
            id: record.id,
            display_name: record
                .display_name
                .unwrap_or_else(|| record.username.clone()),
            username: record.username,
            bio: record.bio,
            avatar_url: record.avatar_url,
            joined_at: record.created_at,
            follower_count,
            following_count,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ToggleFollowResponse {
    pub following: bool,
}
