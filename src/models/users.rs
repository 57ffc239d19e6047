use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{comments::Comment, posts::Post};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub about: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub friend_ids: Vec<u64>,
    #[serde(default)]
    pub bookmarked_posts: Vec<u64>,
}

/// User shape as it leaves the API: everything except the password.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserDto {
    pub id: u64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub about: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub friend_ids: Vec<u64>,
    pub bookmarked_posts: Vec<u64>,
}

impl PublicUserDto {
    pub fn from_user(user: &User) -> Self {
        PublicUserDto {
            id: user.id,
            full_name: user.full_name.to_owned(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            about: user.about.to_owned(),
            avatar: user.avatar.to_owned(),
            cover: user.cover.to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            friend_ids: user.friend_ids.to_owned(),
            bookmarked_posts: user.bookmarked_posts.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct VerifySecretDto {
    pub secret: Option<String>,
}

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email and password are required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Email and password are required."))]
    pub password: String,
}

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Missing required fields."))]
    pub username: String,
    #[validate(length(min = 1, message = "Missing required fields."))]
    pub email: String,
    #[validate(length(min = 1, message = "Missing required fields."))]
    pub password: String,
}

/// Login and register both answer with the shared secret plus the user,
/// flattened into one object.
#[derive(Debug, Serialize)]
pub struct AuthResponseDto {
    pub secret: String,
    #[serde(flatten)]
    pub user: PublicUserDto,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkDto {
    pub post_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailsDto {
    #[serde(flatten)]
    pub user: PublicUserDto,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}
