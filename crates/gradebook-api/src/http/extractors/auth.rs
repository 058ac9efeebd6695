//! Session token authentication extractor.
//!
//! Reads the token issued by `POST /api/v1/auth/login` from the
//! `Authorization: Bearer <token>` header and resolves it to the caller's
//! session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gradebook_core::service::auth::Session;
use gradebook_types::error::AuthError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated caller. Extracting this validates the session token.
pub struct Authenticated(pub Session);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let session = state.gradebook.auth().require(&token)?;
        Ok(Authenticated(session))
    }
}

/// Extract the bearer token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AppError::Auth(AuthError::SessionExpired))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::Validation("invalid Authorization header encoding".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Auth(AuthError::SessionExpired))
}
