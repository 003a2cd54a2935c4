//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{request_owner, AppError, AppState, SuccessResponse};
use tally_core::models::Category;

/// Query parameters for listing categories
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// `1` or `true` keeps only categories linked to a transaction
    pub assigned_only: Option<String>,
}

/// Request body for creating or renaming a category
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

fn flag_set(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// GET /api/categories - List the caller's categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryQuery>,
    request: Request,
) -> Result<Json<Vec<Category>>, AppError> {
    let owner = request_owner(&request)?;
    let assigned_only = flag_set(params.assigned_only.as_deref());

    let categories = state.db.list_categories(owner, assigned_only)?;

    state.db.log_audit(
        owner,
        "list",
        Some("category"),
        None,
        Some(&format!(
            "assigned_only={}, count={}",
            assigned_only,
            categories.len()
        )),
    )?;

    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let owner = request_owner(&request)?;
    let req: CategoryRequest = read_json(request).await?;

    let category = state.db.create_category(owner, &req.name)?;

    state.db.log_audit(
        owner,
        "create",
        Some("category"),
        Some(category.id),
        Some(&format!("name={}", category.name)),
    )?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/:id - Get a single category
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let owner = request_owner(&request)?;

    let category = state.db.get_category(owner, id)?;

    state
        .db
        .log_audit(owner, "view", Some("category"), Some(id), None)?;

    Ok(Json(category))
}

/// PATCH /api/categories/:id - Rename a category
pub async fn rename_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let owner = request_owner(&request)?;
    let req: CategoryRequest = read_json(request).await?;

    let category = state.db.rename_category(owner, id, &req.name)?;

    state.db.log_audit(
        owner,
        "update",
        Some("category"),
        Some(id),
        Some(&format!("name={}", category.name)),
    )?;

    Ok(Json(category))
}

/// DELETE /api/categories/:id - Delete a category (transactions are kept)
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = request_owner(&request)?;

    state.db.delete_category(owner, id)?;

    state
        .db
        .log_audit(owner, "delete", Some("category"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
