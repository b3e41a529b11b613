//! User management handlers. Admin only.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::MIN_PASSWORD_LENGTH;
use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Paginated, PaginationQuery};

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

/// Password strength rule for new accounts
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.chars().count() as u64 >= MIN_PASSWORD_LENGTH
        && UPPERCASE.is_match(password)
        && LOWERCASE.is_match(password)
        && DIGIT.is_match(password)
        && SPECIAL.is_match(password);

    if strong {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must be at least 8 characters and include uppercase, lowercase, digit and special characters".into(),
        ))
    }
}

/// User creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    pub role: Option<String>,
}

/// Sparse update; only present fields are written
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
    pub img: Option<String>,
    pub role: Option<String>,
    pub status: Option<bool>,
    pub email_validated: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            password: req.password,
            img: req.img,
            role: req.role,
            status: req.status,
            email_validated: req.email_validated,
        }
    }
}

/// Identifier echoed back after a write
#[derive(Debug, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("Invalid user ID"))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<ApiResponse<UserRef>> {
    let user = state
        .user_service
        .create(CreateUser {
            name: payload.name,
            email: payload.email,
            password: Some(payload.password),
            role: payload.role,
        })
        .await?;

    Ok(ApiResponse::created(
        "User created successfully",
        UserRef {
            id: user.id,
            email: Some(user.email),
        },
    ))
}

/// List users, optionally paginated and searched
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Paginated<User>>> {
    let pagination = query.into_pagination()?;
    let message = match &pagination {
        Some(p) if p.search.is_some() => "Users search completed successfully",
        Some(_) => "Users retrieved successfully with pagination",
        None => "Users retrieved successfully",
    };

    let users = state.user_service.get_all(pagination).await?;
    Ok(ApiResponse::ok(message, users))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<User>> {
    let user = state.user_service.get_by_id(parse_id(&id)?).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserRef>> {
    let id = parse_id(&id)?;
    state.user_service.update_by_id(id, payload.into()).await?;

    Ok(ApiResponse::ok(
        "User updated successfully",
        UserRef { id, email: None },
    ))
}

/// Disable a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserRef>> {
    let id = parse_id(&id)?;
    state.user_service.delete(id).await?;

    Ok(ApiResponse::ok(
        "User deleted successfully",
        UserRef { id, email: None },
    ))
}
