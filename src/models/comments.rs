use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::PublicUserDto;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub user_id: u64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with its author embedded; `user` is null when the author no
/// longer exists.
#[derive(Debug, Serialize)]
pub struct CommentWithUserDto {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Option<PublicUserDto>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCommentDto {
    pub user_id: Option<u64>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCommentDto {
    pub user_id: Option<u64>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteCommentDto {
    pub user_id: Option<u64>,
}
