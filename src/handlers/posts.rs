use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;

use crate::models::comments::CreateCommentDto;
use crate::models::query::ListParams;
use crate::{Error, Result, SharedState};

pub fn posts_handler() -> Router {
    Router::new()
        .route("/posts/{id}/details", get(post_details))
        .route(
            "/posts/{id}/comments",
            get(post_comments).post(create_comment),
        )
}

async fn post_details(
    Extension(app_state): Extension<SharedState>,
    Path(post_id): Path<u64>,
) -> Result<impl IntoResponse> {
    let details = app_state.posts_service.post_details(post_id).await?;
    Ok(Json(details))
}

async fn post_comments(
    Extension(app_state): Extension<SharedState>,
    Path(post_id): Path<u64>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let comments = app_state
        .posts_service
        .comments_for_post(post_id, params)
        .await?;
    Ok(Json(comments))
}

async fn create_comment(
    Extension(app_state): Extension<SharedState>,
    Path(post_id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let body: CreateCommentDto = serde_json::from_value(body)
        .map_err(|_| Error::BadRequest("userId and body are required".to_string()))?;
    let (user_id, text) = match (body.user_id, body.body) {
        (Some(user_id), Some(text)) if !text.is_empty() => (user_id, text),
        _ => {
            return Err(Error::BadRequest(
                "userId and body are required".to_string(),
            ))
        }
    };

    let comment = app_state
        .posts_service
        .create_comment(post_id, user_id, text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
