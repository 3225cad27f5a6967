//! User handlers.

use actix_web::{HttpResponse, web};

use bloglist_core::DomainError;
use bloglist_core::domain::{User, UserWithBlogs};
use bloglist_shared::dto::{RegisterUserRequest, UserResponse};

use super::views;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_CREDENTIAL_LEN: usize = 3;

fn validate(req: &RegisterUserRequest) -> Result<(), AppError> {
    if req.username.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(AppError::BadRequest(format!(
            "username must be at least {MIN_CREDENTIAL_LEN} characters long"
        )));
    }
    if req.password.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_CREDENTIAL_LEN} characters long"
        )));
    }
    Ok(())
}

/// POST /api/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate(&req)?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(DomainError::Duplicate("expected `username` to be unique".to_string()).into());
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .create(User::new(req.username, req.name, password_hash))
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let response: UserResponse = views::user(UserWithBlogs {
        user,
        blogs: Vec::new(),
    });

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/users
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(views::user)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}
