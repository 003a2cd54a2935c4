//! Category percentages that always add up to 100

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::Serialize;

use crate::period::DateRange;

/// Label for outcome not linked to any category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Outcome sum for one category (or for uncategorized outcome)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// `None` groups transactions without a category
    pub category_id: Option<i64>,
    pub name: String,
    pub total: i64,
}

impl CategoryTotal {
    pub fn new(category_id: i64, name: impl Into<String>, total: i64) -> Self {
        Self {
            category_id: Some(category_id),
            name: name.into(),
            total,
        }
    }

    pub fn uncategorized(total: i64) -> Self {
        Self {
            category_id: None,
            name: UNCATEGORIZED.to_string(),
            total,
        }
    }
}

/// One category's reconciled share of the grand total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category_id: Option<i64>,
    pub name: String,
    pub total: i64,
    pub percent: i32,
}

/// Result of [`allocate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Ordered by descending total
    pub shares: Vec<CategoryShare>,
    pub grand_total: i64,
    /// Points that could not be placed because every entry was pinned
    pub residual: i32,
}

impl Allocation {
    pub fn percent_sum(&self) -> i32 {
        self.shares.iter().map(|s| s.percent).sum()
    }
}

/// Integer `round(part * 100 / whole)` with ties to even; 0 when `whole` is 0
fn rounded_percent(part: i64, whole: i64) -> i32 {
    if whole <= 0 {
        return 0;
    }
    let numerator = i128::from(part) * 100;
    let whole = i128::from(whole);
    let quotient = numerator / whole;
    let twice_remainder = (numerator % whole) * 2;
    let rounded = if twice_remainder > whole || (twice_remainder == whole && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded as i32
}

/// Reconcile per-category percentages so they sum to exactly 100
///
/// Entries are ordered by descending total (ties by category id, the
/// uncategorized bucket last). The rounding drift is then paid out one point
/// at a time from the top of that order: increments go to entries above 0%,
/// decrements to entries strictly between 0% and 100%. Passes repeat until
/// the drift is gone or a full pass moves nothing, in which case the rest is
/// left in [`Allocation::residual`].
pub fn allocate(totals: &[CategoryTotal]) -> Allocation {
    let grand_total: i64 = totals.iter().map(|t| t.total).sum();

    let mut shares: Vec<CategoryShare> = totals
        .iter()
        .map(|t| CategoryShare {
            category_id: t.category_id,
            name: t.name.clone(),
            total: t.total,
            percent: rounded_percent(t.total, grand_total),
        })
        .collect();
    shares.sort_by_key(|s| (Reverse(s.total), s.category_id.is_none(), s.category_id));

    if grand_total <= 0 {
        return Allocation {
            shares,
            grand_total,
            residual: 0,
        };
    }

    let mut adjustment = 100 - shares.iter().map(|s| s.percent).sum::<i32>();
    while adjustment != 0 {
        let mut moved = false;
        for share in shares.iter_mut() {
            if adjustment > 0 && share.percent > 0 {
                share.percent += 1;
                adjustment -= 1;
                moved = true;
            } else if adjustment < 0 && share.percent > 0 && share.percent < 100 {
                share.percent -= 1;
                adjustment += 1;
                moved = true;
            }
            if adjustment == 0 {
                break;
            }
        }
        if !moved {
            break;
        }
    }

    Allocation {
        shares,
        grand_total,
        residual: adjustment,
    }
}

/// Wire form of a [`CategoryShare`]
#[derive(Debug, Clone, Serialize)]
pub struct TypeCostEntry {
    pub category_id: Option<i64>,
    pub name: String,
    pub total: i64,
    /// Display label, e.g. `"57%"`
    pub percent: String,
    /// `[percent, 100 - percent]` for a doughnut chart
    pub data: [i32; 2],
}

impl From<&CategoryShare> for TypeCostEntry {
    fn from(share: &CategoryShare) -> Self {
        Self {
            category_id: share.category_id,
            name: share.name.clone(),
            total: share.total,
            percent: format!("{}%", share.percent),
            data: [share.percent, 100 - share.percent],
        }
    }
}

/// Category breakdown chart for a period
#[derive(Debug, Clone, Serialize)]
pub struct TypeCost {
    pub from: NaiveDate,
    pub end: NaiveDate,
    pub total: i64,
    pub data: Vec<TypeCostEntry>,
    pub residual: i32,
}

impl TypeCost {
    pub fn new(range: DateRange, allocation: &Allocation) -> Self {
        Self {
            from: range.from,
            end: range.end,
            total: allocation.grand_total,
            data: allocation.shares.iter().map(TypeCostEntry::from).collect(),
            residual: allocation.residual,
        }
    }
}
