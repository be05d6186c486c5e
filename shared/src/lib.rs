//! Record and request types shared between the storage layer, the REST layer
//! and any client of the budget tracker API.
//!
//! The record structs (`Account`, `Category`, `AccountEntry`, `MoneyFlow`)
//! mirror the persisted columns one to one; validation lives in the backend
//! domain model, never here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Whether a category collects money going out or coming in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryType {
    Expense,
    Income,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "Expense",
            CategoryType::Income => "Income",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expense" => Ok(CategoryType::Expense),
            "income" => Ok(CategoryType::Income),
            other => Err(format!("Unknown category type: {}", other)),
        }
    }
}

/// Cadence a money flow can be scheduled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    /// Number of days between two occurrences
    pub fn days(&self) -> i32 {
        match self {
            PeriodType::Daily => 1,
            PeriodType::Weekly => 7,
            PeriodType::Monthly => 30,
        }
    }
}

/// Persisted account row. The id is also the owning user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Starting balance the entries are applied on top of
    pub basis_sum: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Account (user) the category belongs to
    pub account_id: Uuid,
    pub name: String,
    pub category_type: CategoryType,
}

/// Persisted ledger entry row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub id: Uuid,
    /// Calendar date in UTC, no time of day
    pub date: NaiveDate,
    /// Signed amount: negative for expenses, positive for income
    pub sum: Decimal,
    pub category_id: Option<Uuid>,
    pub account_id: Uuid,
}

/// Persisted recurring flow row, schedule fields flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyFlow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub sum: Decimal,
    pub starting_date: NaiveDate,
    /// Date of the last materialized entry, `None` until the first one
    pub last_checked_date: Option<NaiveDate>,
    pub period_days: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub basis_sum: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub category_type: CategoryType,
}

/// Body for creating an entry, and for replacing one in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountEntryRequest {
    pub sum: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMoneyFlowRequest {
    pub sum: Decimal,
    /// First date an entry is produced on; must be tomorrow or later
    pub starting_date: NaiveDate,
    pub period: PeriodType,
    pub category_id: Option<Uuid>,
}

/// Optional filters for listing entries of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountEntryFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}
