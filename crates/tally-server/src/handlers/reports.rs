//! Ledger report handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header, Response, StatusCode},
};
use serde::Deserialize;
use tracing::info;

use crate::{request_owner, AppError, AppState};
use tally_core::report::ReportPeriod;

/// Query parameters for ledger reports
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Output format (default: csv)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /api/reports/monthly/:year/:month - Ledger for one month
pub async fn report_monthly(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
    Query(params): Query<ReportQuery>,
    request: Request,
) -> Result<Response<Body>, AppError> {
    render_report(&state, &request, ReportPeriod::month(year, month), &params.format)
}

/// GET /api/reports/yearly/:year - Ledger for one year
pub async fn report_yearly(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
    Query(params): Query<ReportQuery>,
    request: Request,
) -> Result<Response<Body>, AppError> {
    render_report(&state, &request, ReportPeriod::year(year), &params.format)
}

fn render_report(
    state: &AppState,
    request: &Request,
    period: ReportPeriod,
    format: &str,
) -> Result<Response<Body>, AppError> {
    let owner = request_owner(request)?;

    if format != "csv" && format != "json" {
        return Err(AppError::bad_request("Invalid format. Use 'csv' or 'json'"));
    }

    let report = state.db.ledger_report(owner, period)?;

    // Audit log
    state.db.log_audit(
        owner,
        "report",
        Some("ledger"),
        None,
        Some(&format!(
            "format={}, file={}, rows={}",
            format,
            report.file_name(),
            report.rows.len()
        )),
    )?;

    if format == "csv" {
        let csv = report.to_csv()?;
        info!(rows = report.rows.len(), file = %report.file_name(), "Exported ledger report to CSV");

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name()),
            )
            .body(Body::from(csv))
            .map_err(|e| AppError::internal(&e.to_string()))
    } else {
        let json = serde_json::to_vec_pretty(&report)
            .map_err(|e| AppError::internal(&e.to_string()))?;

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json))
            .map_err(|e| AppError::internal(&e.to_string()))
    }
}
