use axum::{
    middleware::{from_fn, from_fn_with_state},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    auth::auth_handler, comments::comments_handler, crud::crud_routes, posts::posts_handler,
    users::users_handler,
};
use crate::middleware::{configure_cors, delay, stamp_write_timestamps};
use crate::models::{posts::Post, users::User};
use crate::SharedState;

pub fn create_router(app_state: SharedState) -> Router {
    // Custom relational routes and the generic CRUD surface share the same
    // /api/v1 prefix; paths never overlap except for comments, which wire
    // their own mix (see comments_handler).
    let api_route = Router::new()
        .merge(auth_handler())
        .merge(users_handler())
        .merge(posts_handler())
        .merge(comments_handler())
        .merge(crud_routes::<User>())
        .merge(crud_routes::<Post>())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .nest("/api/v1", api_route)
        .layer(from_fn(stamp_write_timestamps))
        .layer(from_fn_with_state(app_state, delay))
        .layer(configure_cors())
}
