//! Month target and save-money target handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use super::read_json;
use crate::{request_owner, AppError, AppState, SuccessResponse};
use tally_core::models::{
    MonthTarget, MonthTargetPatch, NewMonthTarget, NewSaveMoneyTarget, SaveMoneyTarget,
    SaveMoneyTargetPatch,
};

// ========== Month targets ==========

/// GET /api/targets/month - List month targets, newest period first
pub async fn list_month_targets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<MonthTarget>>, AppError> {
    let owner = request_owner(&request)?;

    let targets = state.db.list_month_targets(owner)?;

    state.db.log_audit(
        owner,
        "list",
        Some("month_target"),
        None,
        Some(&format!("count={}", targets.len())),
    )?;

    Ok(Json(targets))
}

/// POST /api/targets/month - Set the target for a month (409 if one exists)
pub async fn create_month_target(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<MonthTarget>), AppError> {
    let owner = request_owner(&request)?;
    let req: NewMonthTarget = read_json(request).await?;

    let target = state.db.create_month_target(owner, &req)?;

    state.db.log_audit(
        owner,
        "create",
        Some("month_target"),
        Some(target.id),
        Some(&format!("period={}-{:02}", target.year, target.month)),
    )?;

    Ok((StatusCode::CREATED, Json(target)))
}

/// GET /api/targets/month/:year/:month - The target for one period
pub async fn get_month_target(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
    request: Request,
) -> Result<Json<MonthTarget>, AppError> {
    let owner = request_owner(&request)?;

    let target = state.db.get_month_target_for(owner, year, month)?;

    state
        .db
        .log_audit(owner, "view", Some("month_target"), Some(target.id), None)?;

    Ok(Json(target))
}

/// PUT /api/targets/month/id/:id - Replace a month target
pub async fn replace_month_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<MonthTarget>, AppError> {
    let owner = request_owner(&request)?;
    let req: NewMonthTarget = read_json(request).await?;

    let target = state
        .db
        .update_month_target(owner, id, &MonthTargetPatch::from(req))?;

    state
        .db
        .log_audit(owner, "update", Some("month_target"), Some(id), None)?;

    Ok(Json(target))
}

/// PATCH /api/targets/month/id/:id - Update some fields of a month target
pub async fn patch_month_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<MonthTarget>, AppError> {
    let owner = request_owner(&request)?;
    let req: MonthTargetPatch = read_json(request).await?;

    let target = state.db.update_month_target(owner, id, &req)?;

    state
        .db
        .log_audit(owner, "patch", Some("month_target"), Some(id), None)?;

    Ok(Json(target))
}

/// DELETE /api/targets/month/id/:id - Delete a month target
pub async fn delete_month_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = request_owner(&request)?;

    state.db.delete_month_target(owner, id)?;

    state
        .db
        .log_audit(owner, "delete", Some("month_target"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

// ========== Save-money targets ==========

/// GET /api/targets/save - List save-money targets
pub async fn list_save_targets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<SaveMoneyTarget>>, AppError> {
    let owner = request_owner(&request)?;

    let targets = state.db.list_save_targets(owner)?;

    state.db.log_audit(
        owner,
        "list",
        Some("save_target"),
        None,
        Some(&format!("count={}", targets.len())),
    )?;

    Ok(Json(targets))
}

/// POST /api/targets/save - Create a save-money target for a category
pub async fn create_save_target(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<SaveMoneyTarget>), AppError> {
    let owner = request_owner(&request)?;
    let req: NewSaveMoneyTarget = read_json(request).await?;

    let target = state.db.create_save_target(owner, &req)?;

    state.db.log_audit(
        owner,
        "create",
        Some("save_target"),
        Some(target.id),
        Some(&format!(
            "category_id={}, target_amount={}",
            target.category_id, target.target_amount
        )),
    )?;

    Ok((StatusCode::CREATED, Json(target)))
}

/// GET /api/targets/save/:id - Get a single save-money target
pub async fn get_save_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SaveMoneyTarget>, AppError> {
    let owner = request_owner(&request)?;

    let target = state.db.get_save_target(owner, id)?;

    state
        .db
        .log_audit(owner, "view", Some("save_target"), Some(id), None)?;

    Ok(Json(target))
}

/// PUT /api/targets/save/:id - Replace a save-money target
pub async fn replace_save_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SaveMoneyTarget>, AppError> {
    let owner = request_owner(&request)?;
    let req: NewSaveMoneyTarget = read_json(request).await?;

    let target = state
        .db
        .update_save_target(owner, id, &SaveMoneyTargetPatch::from(req))?;

    state
        .db
        .log_audit(owner, "update", Some("save_target"), Some(id), None)?;

    Ok(Json(target))
}

/// PATCH /api/targets/save/:id - Update some fields of a save-money target
///
/// An explicit `null` for `from_date` or `end_date` opens that side of the window.
pub async fn patch_save_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SaveMoneyTarget>, AppError> {
    let owner = request_owner(&request)?;
    let req: SaveMoneyTargetPatch = read_json(request).await?;

    let target = state.db.update_save_target(owner, id, &req)?;

    state
        .db
        .log_audit(owner, "patch", Some("save_target"), Some(id), None)?;

    Ok(Json(target))
}

/// DELETE /api/targets/save/:id - Delete a save-money target
pub async fn delete_save_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = request_owner(&request)?;

    state.db.delete_save_target(owner, id)?;

    state
        .db
        .log_audit(owner, "delete", Some("save_target"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
