//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{parse_id_list, range_or_current_month, read_json};
use crate::{request_owner, AppError, AppState, SuccessResponse};
use tally_core::db::TransactionFilter;
use tally_core::models::{EntryKind, NewTransaction, Transaction, TransactionPatch};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Start date (YYYY-MM-DD); defaults to the first of the current month
    pub from: Option<String>,
    /// End date (YYYY-MM-DD); defaults to the last of the current month
    pub end: Option<String>,
    /// Comma-separated category ids
    pub categories: Option<String>,
    /// `income` or `outcome`
    pub kind: Option<String>,
}

/// Transactions in a range, echoing the resolved bounds
#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub from: NaiveDate,
    pub end: NaiveDate,
    pub data: Vec<Transaction>,
}

/// GET /api/transactions - List the caller's transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    request: Request,
) -> Result<Json<TransactionList>, AppError> {
    let owner = request_owner(&request)?;

    let range = range_or_current_month(params.from.as_deref(), params.end.as_deref())?;
    let category_ids = match params.categories.as_deref() {
        Some(list) => parse_id_list(list)?,
        None => Vec::new(),
    };
    let kind = params
        .kind
        .as_deref()
        .map(|k| k.parse::<EntryKind>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let filter = TransactionFilter::new(range)
        .with_categories(category_ids)
        .with_kind(kind);
    let transactions = state.db.list_transactions(owner, &filter)?;

    state.db.log_audit(
        owner,
        "list",
        Some("transaction"),
        None,
        Some(&format!(
            "from={}, end={}, categories={:?}, kind={:?}, count={}",
            range.from,
            range.end,
            filter.category_ids,
            kind,
            transactions.len()
        )),
    )?;

    Ok(Json(TransactionList {
        from: range.from,
        end: range.end,
        data: transactions,
    }))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let owner = request_owner(&request)?;
    let req: NewTransaction = read_json(request).await?;

    let transaction = state.db.create_transaction(owner, &req)?;

    state.db.log_audit(
        owner,
        "create",
        Some("transaction"),
        Some(transaction.id),
        Some(&format!(
            "kind={}, amount={}, date={}",
            transaction.kind, transaction.amount, transaction.date
        )),
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let owner = request_owner(&request)?;

    let transaction = state.db.get_transaction(owner, id)?;

    state
        .db
        .log_audit(owner, "view", Some("transaction"), Some(id), None)?;

    Ok(Json(transaction))
}

/// PUT /api/transactions/:id - Replace every field of a transaction
pub async fn replace_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let owner = request_owner(&request)?;
    let req: NewTransaction = read_json(request).await?;

    let transaction = state
        .db
        .update_transaction(owner, id, &TransactionPatch::from(req))?;

    state
        .db
        .log_audit(owner, "update", Some("transaction"), Some(id), None)?;

    Ok(Json(transaction))
}

/// PATCH /api/transactions/:id - Update some fields of a transaction
pub async fn patch_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let owner = request_owner(&request)?;
    let req: TransactionPatch = read_json(request).await?;

    let transaction = state.db.update_transaction(owner, id, &req)?;

    state.db.log_audit(
        owner,
        "patch",
        Some("transaction"),
        Some(id),
        Some(&format!(
            "amount={:?}, categories={:?}",
            req.amount, req.category_ids
        )),
    )?;

    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = request_owner(&request)?;

    state.db.delete_transaction(owner, id)?;

    state
        .db
        .log_audit(owner, "delete", Some("transaction"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
