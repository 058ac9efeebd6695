//! Session endpoints.
//!
//! POST /api/v1/auth/login  - exchange credentials for a bearer token.
//! POST /api/v1/auth/logout - revoke the caller's token.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use gradebook_types::academic::Role;
use gradebook_types::outcome::Outcome;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let start = Instant::now();
    let session = state
        .gradebook
        .auth()
        .login(&body.user_id, &body.password)
        .await?;

    Ok(ApiResponse::success(
        LoginResponse {
            token: session.token,
            user_id: session.user_id,
            role: session.role,
        },
        start,
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResponse<Outcome> {
    let start = Instant::now();
    state.gradebook.auth().logout(&session.token);
    ApiResponse::success(Outcome::success("logged out"), start)
}
