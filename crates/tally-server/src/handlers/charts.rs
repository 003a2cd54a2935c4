//! Chart handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::required_range;
use crate::{request_owner, AppError, AppState};
use tally_core::charts::{Comparison, RangeChart, SavingsProgress, TargetProgress, TypeCost};
use tally_core::period::parse_bounds;

/// Query parameters shared by the range-based charts
#[derive(Debug, Deserialize)]
pub struct ChartRangeQuery {
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub end: Option<String>,
}

/// GET /api/charts/range_cost - Daily income/outcome over a range
pub async fn chart_range_cost(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartRangeQuery>,
    request: Request,
) -> Result<Json<RangeChart>, AppError> {
    let owner = request_owner(&request)?;
    // Bounds stay raw so a reversed pair reports as too short
    let (from, end) = parse_bounds(params.from.as_deref(), params.end.as_deref())?;

    let chart = state.db.range_chart(owner, from, end)?;

    state.db.log_audit(
        owner,
        "chart",
        Some("range_cost"),
        None,
        Some(&format!("from={}, end={}", from, end)),
    )?;

    Ok(Json(chart))
}

/// GET /api/charts/type_cost - Outcome share per category
pub async fn chart_type_cost(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartRangeQuery>,
    request: Request,
) -> Result<Json<TypeCost>, AppError> {
    let owner = request_owner(&request)?;
    let range = required_range(params.from.as_deref(), params.end.as_deref())?;

    let chart = state.db.type_cost(owner, range)?;

    state.db.log_audit(
        owner,
        "chart",
        Some("type_cost"),
        None,
        Some(&format!(
            "from={}, end={}, categories={}",
            range.from,
            range.end,
            chart.data.len()
        )),
    )?;

    Ok(Json(chart))
}

/// GET /api/charts/compare_cost - Range totals against the preceding range
pub async fn chart_compare_cost(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartRangeQuery>,
    request: Request,
) -> Result<Json<Comparison>, AppError> {
    let owner = request_owner(&request)?;
    let range = required_range(params.from.as_deref(), params.end.as_deref())?;

    let comparison = state.db.compare_cost(owner, range)?;

    state.db.log_audit(
        owner,
        "chart",
        Some("compare_cost"),
        None,
        Some(&format!("from={}, end={}", range.from, range.end)),
    )?;

    Ok(Json(comparison))
}

/// GET /api/charts/target/:year/:month - Month target progress
pub async fn chart_month_target(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
    request: Request,
) -> Result<Json<TargetProgress>, AppError> {
    let owner = request_owner(&request)?;

    let progress = state.db.month_target_progress(owner, year, month)?;

    state.db.log_audit(
        owner,
        "chart",
        Some("month_target"),
        None,
        Some(&format!("period={}-{:02}", year, month)),
    )?;

    Ok(Json(progress))
}

/// GET /api/charts/save_target/:category_id - Save-money target progress
pub async fn chart_save_target(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
    request: Request,
) -> Result<Json<SavingsProgress>, AppError> {
    let owner = request_owner(&request)?;

    let progress = state.db.savings_progress(owner, category_id)?;

    state.db.log_audit(
        owner,
        "chart",
        Some("save_target"),
        Some(category_id),
        None,
    )?;

    Ok(Json(progress))
}
