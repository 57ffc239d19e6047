use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::models::query::ListParams;
use crate::store::Entity;
use crate::{Result, SharedState};

/// Generic json-server style CRUD surface for one collection. No relational
/// checks happen here; those belong to the hand-written endpoints.
pub fn crud_routes<T: Entity>() -> Router {
    Router::new()
        .route(
            &format!("/{}", T::COLLECTION),
            get(list::<T>).post(create::<T>),
        )
        .route(
            &format!("/{}/{{id}}", T::COLLECTION),
            get(get_one::<T>)
                .put(replace::<T>)
                .patch(patch_one::<T>)
                .delete(delete_one::<T>),
        )
}

pub async fn list<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let rows = app_state.store.all::<T>().await;
    let rows = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<core::result::Result<Vec<Value>, _>>()?;

    let mut rows = params.apply(rows);
    for row in &mut rows {
        T::sanitize(row);
    }

    Ok(Json(rows))
}

pub async fn get_one<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    let row = app_state
        .store
        .find::<T>(id)
        .await
        .ok_or_else(T::not_found)?;

    let mut row = serde_json::to_value(&row)?;
    T::sanitize(&mut row);

    Ok(Json(row))
}

pub async fn create<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let row = app_state.store.insert_value::<T>(body).await?;

    let mut row = serde_json::to_value(&row)?;
    T::sanitize(&mut row);

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn replace<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let row = app_state.store.replace::<T>(id, body).await?;

    let mut row = serde_json::to_value(&row)?;
    T::sanitize(&mut row);

    Ok(Json(row))
}

pub async fn patch_one<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let row = app_state.store.patch::<T>(id, body).await?;

    let mut row = serde_json::to_value(&row)?;
    T::sanitize(&mut row);

    Ok(Json(row))
}

pub async fn delete_one<T: Entity>(
    Extension(app_state): Extension<SharedState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    app_state.store.remove::<T>(id).await?;
    Ok(Json(json!({})))
}
