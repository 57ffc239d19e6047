use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{comments::CommentWithUserDto, users::PublicUserDto};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its author and comments; `userId` is replaced by the
/// embedded `user` object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailsDto {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: PublicUserDto,
    pub comments: Vec<CommentWithUserDto>,
}
