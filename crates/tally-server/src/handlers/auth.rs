//! Authentication-related handlers

use std::sync::Arc;

use axum::extract::Request;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::{request_owner, AppError, AppState, AuthMethod};

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub account: String,
    pub name: String,
    pub email: Option<String>,
    /// How the user was authenticated
    pub auth_method: AuthMethod,
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MeResponse>, AppError> {
    let owner = request_owner(&request)?;
    let auth_method = request
        .extensions()
        .get::<AuthMethod>()
        .copied()
        .unwrap_or(AuthMethod::ApiKey);

    let user = state
        .db
        .get_user(owner.id())?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    state
        .db
        .log_audit(owner, "view", Some("user"), Some(user.id), None)?;

    Ok(Json(MeResponse {
        id: user.id,
        account: user.account,
        name: user.name,
        email: user.email,
        auth_method,
    }))
}
