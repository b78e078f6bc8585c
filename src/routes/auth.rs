// src/routes/auth.rs

use axum::{extract::State, Json};

use super::ApiError;
use crate::{
    models::{LoginBody, LoginOk},
    AppState,
};

/// POST /api/login
///
/// Checks the pair against the configured accounts. Nothing is issued on
/// success; later requests are not authenticated by this call.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<LoginOk>, ApiError> {
    let Json(b) = body?;
    let (Some(username), Some(password)) = (b.username, b.password) else {
        return Err(ApiError::InvalidCredentials);
    };

    if !state.credentials.verify(&username, &password) {
        tracing::warn!(%username, "login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!(%username, "login accepted");
    Ok(Json(LoginOk { success: true, user: username }))
}
