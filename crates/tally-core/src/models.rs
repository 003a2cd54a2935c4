//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// The user every record is scoped to
///
/// Produced by the authentication layer and trusted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(pub i64);

impl Owner {
    pub fn id(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Unique login handle
    pub account: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn owner(&self) -> Owner {
        Owner(self.id)
    }
}

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Outcome,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }

    /// Signed contribution of `amount` to a running balance
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            Self::Income => amount,
            Self::Outcome => -amount,
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "outcome" | "expense" => Ok(Self::Outcome),
            _ => Err(format!("Unknown entry kind: {} (use income or outcome)", s)),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending category owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: i64,
    pub name: String,
}

/// A recorded income or outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: i64,
    pub date: NaiveDate,
    pub kind: EntryKind,
    /// Always non-negative; direction comes from `kind`
    pub amount: i64,
    pub categories: Vec<Category>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be inserted
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: i64,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, kind: EntryKind, amount: i64) -> Self {
        Self {
            date,
            kind,
            amount,
            category_ids: Vec::new(),
            title: String::new(),
            description: String::new(),
        }
    }

    pub fn with_categories(mut self, ids: Vec<i64>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Partial update of a transaction; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub kind: Option<EntryKind>,
    pub amount: Option<i64>,
    pub category_ids: Option<Vec<i64>>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<NewTransaction> for TransactionPatch {
    fn from(tx: NewTransaction) -> Self {
        Self {
            date: Some(tx.date),
            kind: Some(tx.kind),
            amount: Some(tx.amount),
            category_ids: Some(tx.category_ids),
            title: Some(tx.title),
            description: Some(tx.description),
        }
    }
}

/// Income/outcome goals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTarget {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: i64,
    pub year: i32,
    pub month: u32,
    pub income_target: i64,
    pub outcome_target: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMonthTarget {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub income_target: i64,
    #[serde(default)]
    pub outcome_target: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthTargetPatch {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub income_target: Option<i64>,
    pub outcome_target: Option<i64>,
}

impl From<NewMonthTarget> for MonthTargetPatch {
    fn from(t: NewMonthTarget) -> Self {
        Self {
            year: Some(t.year),
            month: Some(t.month),
            income_target: Some(t.income_target),
            outcome_target: Some(t.outcome_target),
        }
    }
}

/// A spending cap for one category over an optional date window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMoneyTarget {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: i64,
    pub category_id: i64,
    pub target_amount: i64,
    /// Open-ended when absent
    pub from_date: Option<NaiveDate>,
    /// Open-ended when absent
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSaveMoneyTarget {
    pub category_id: i64,
    pub target_amount: i64,
    pub from_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveMoneyTargetPatch {
    pub category_id: Option<i64>,
    pub target_amount: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub from_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl From<NewSaveMoneyTarget> for SaveMoneyTargetPatch {
    fn from(t: NewSaveMoneyTarget) -> Self {
        Self {
            category_id: Some(t.category_id),
            target_amount: Some(t.target_amount),
            from_date: Some(t.from_date),
            end_date: Some(t.end_date),
        }
    }
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub owner_id: i64,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}
