use axum::{
    body::Bytes,
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::handlers::crud;
use crate::models::comments::{Comment, DeleteCommentDto, UpdateCommentDto};
use crate::models::response::MessageResponse;
use crate::{Result, SharedState};

/// Comment routes mix the generic CRUD surface with author-checked edit and
/// delete, so they are wired together here to keep one method router per
/// path.
pub fn comments_handler() -> Router {
    Router::new()
        .route(
            "/comments",
            get(crud::list::<Comment>).post(crud::create::<Comment>),
        )
        .route(
            "/comments/{id}",
            get(crud::get_one::<Comment>)
                .put(crud::replace::<Comment>)
                .patch(edit_comment)
                .delete(delete_comment),
        )
}

// The body is optional: without a userId the author check simply fails.
async fn edit_comment(
    Extension(app_state): Extension<SharedState>,
    Path(comment_id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let body: UpdateCommentDto = serde_json::from_slice(&body).unwrap_or_default();

    let comment = app_state
        .comments_service
        .edit(comment_id, body.user_id, body.body)
        .await?;

    Ok(Json(comment))
}

async fn delete_comment(
    Extension(app_state): Extension<SharedState>,
    Path(comment_id): Path<u64>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let body: DeleteCommentDto = serde_json::from_slice(&body).unwrap_or_default();

    app_state
        .comments_service
        .delete(comment_id, body.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted",
    }))
}
