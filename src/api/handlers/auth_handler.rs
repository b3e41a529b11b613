//! Authentication handlers.

use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::User;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token renewal request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenSignInRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/sign-in-with-token", post(sign_in_with_token))
}

/// Login and get JWT token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<User>> {
    let auth = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::ok("Login successful", auth.user).with_token(auth.token))
}

/// Exchange a valid token for a new one
pub async fn sign_in_with_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenSignInRequest>,
) -> AppResult<ApiResponse<User>> {
    let auth = state.auth_service.sign_in_with_token(&payload.token).await?;

    Ok(ApiResponse::ok("Token sign-in successful", auth.user).with_token(auth.token))
}
