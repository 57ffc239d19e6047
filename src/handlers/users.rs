use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::Value;

use crate::models::users::BookmarkDto;
use crate::{Error, Result, SharedState};

pub fn users_handler() -> Router {
    Router::new()
        .route("/users/{id}/details", get(user_details))
        .route("/users/{id}/bookmark", patch(toggle_bookmark))
        .route("/users/{id}/friends", patch(replace_friends))
}

async fn user_details(
    Extension(app_state): Extension<SharedState>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse> {
    let details = app_state.users_service.user_details(user_id).await?;
    Ok(Json(details))
}

async fn toggle_bookmark(
    Extension(app_state): Extension<SharedState>,
    Path(user_id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let body: BookmarkDto = serde_json::from_value(body)
        .map_err(|_| Error::BadRequest("postId is required".to_string()))?;
    let post_id = body
        .post_id
        .ok_or_else(|| Error::BadRequest("postId is required".to_string()))?;

    let user = app_state
        .users_service
        .toggle_bookmark(user_id, post_id)
        .await?;

    Ok(Json(user))
}

async fn replace_friends(
    Extension(app_state): Extension<SharedState>,
    Path(user_id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let friend_ids = body
        .get("friendIds")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::BadRequest("friendIds must be an array".to_string()))?;
    let friend_ids: Vec<u64> = friend_ids
        .iter()
        .map(Value::as_u64)
        .collect::<Option<_>>()
        .ok_or_else(|| Error::BadRequest("Invalid friendId(s) provided".to_string()))?;

    let user = app_state
        .users_service
        .replace_friends(user_id, friend_ids)
        .await?;

    Ok(Json(user))
}
