use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use serde_json::Value;
use validator::Validate;

use crate::models::response::MessageResponse;
use crate::models::users::{LoginUserDto, RegisterUserDto, VerifySecretDto};
use crate::{Error, Result, SharedState};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/verify", post(verify))
        .route("/login", post(login))
        .route("/register", post(register))
}

async fn verify(
    Extension(app_state): Extension<SharedState>,
    Json(body): Json<VerifySecretDto>,
) -> Result<impl IntoResponse> {
    app_state
        .auth_service
        .verify_secret(body.secret.as_deref().unwrap_or_default())?;

    Ok(Json(MessageResponse {
        message: "Verified.",
    }))
}

async fn login(
    Extension(app_state): Extension<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let credentials: LoginUserDto = serde_json::from_value(body)
        .map_err(|_| Error::BadRequest("Email and password are required.".to_string()))?;
    credentials.validate()?;

    let response = app_state
        .auth_service
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(response))
}

async fn register(
    Extension(app_state): Extension<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let new_user: RegisterUserDto = serde_json::from_value(body)
        .map_err(|_| Error::BadRequest("Missing required fields.".to_string()))?;
    new_user.validate()?;

    let response = app_state
        .auth_service
        .register(new_user.username, new_user.email, new_user.password)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}
