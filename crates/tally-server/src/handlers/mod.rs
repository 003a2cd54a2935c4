//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod auth;
pub mod categories;
pub mod charts;
pub mod reports;
pub mod targets;
pub mod transactions;

// Re-export all handlers for use in router
pub use audit::*;
pub use auth::*;
pub use categories::*;
pub use charts::*;
pub use reports::*;
pub use targets::*;
pub use transactions::*;

use axum::extract::Request;
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{AppError, MAX_BODY_SIZE};
use tally_core::DateRange;

/// Read and parse a JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// `from`/`end` query bounds, both required
pub(crate) fn required_range(
    from: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, AppError> {
    Ok(DateRange::parse(from, end)?)
}

/// `from`/`end` query bounds, defaulting to the current calendar month
pub(crate) fn range_or_current_month(
    from: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, AppError> {
    match (from, end) {
        (None, None) => Ok(DateRange::month_of(Utc::now().date_naive())),
        _ => required_range(from, end),
    }
}

/// Parse a comma-separated id list such as `1,2,3`
pub(crate) fn parse_id_list(input: &str) -> Result<Vec<i64>, AppError> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::bad_request(&format!("Invalid id '{}'", s)))
        })
        .collect()
}
