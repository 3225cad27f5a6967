//! Login handler.

use actix_web::{HttpResponse, web};

use bloglist_core::ports::AuthError;
use bloglist_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/login
///
/// An unknown username and a wrong password are reported identically.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(user) = state.users.find_by_username(&req.username).await? else {
        tracing::debug!(username = %req.username, "Login for unknown user");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        username: user.username,
        name: user.name,
    }))
}
