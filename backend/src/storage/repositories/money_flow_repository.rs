use chrono::NaiveDate;
use shared::{Account, Category, MoneyFlow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::{parse_column, parse_optional_column};
use crate::storage::StoreError;

const TABLE: &str = "money_flows";

const COLUMNS: &str = "id, account_id, category_id, sum, starting_date, last_checked_date, period_days";

/// A money flow row joined with its owning account and optional category
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyFlowDetails {
    pub flow: MoneyFlow,
    pub account: Account,
    pub category: Option<Category>,
}

pub struct MoneyFlowRepository;

impl MoneyFlowRepository {
    /// Store a money flow in the database
    pub async fn insert(conn: &mut SqliteConnection, flow: &MoneyFlow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO money_flows (id, account_id, category_id, sum, starting_date, last_checked_date, period_days)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(flow.id.to_string())
        .bind(flow.account_id.to_string())
        .bind(flow.category_id.map(|id| id.to_string()))
        .bind(flow.sum.to_string())
        .bind(flow.starting_date)
        .bind(flow.last_checked_date)
        .bind(flow.period_days)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Get a money flow by ID
    pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<MoneyFlow>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM money_flows WHERE id = ?", COLUMNS))
            .bind(id.to_string())
            .fetch_optional(conn)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// All money flows of an account by starting date
    pub async fn list_by_account(conn: &mut SqliteConnection, account_id: Uuid) -> Result<Vec<MoneyFlow>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM money_flows WHERE account_id = ? ORDER BY starting_date, id",
            COLUMNS
        ))
        .bind(account_id.to_string())
        .fetch_all(conn)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    /// Write back the schedule fields of each flow. Returns how many rows
    /// were found and updated.
    pub async fn update_schedules(conn: &mut SqliteConnection, flows: &[MoneyFlow]) -> Result<u64, StoreError> {
        let mut updated = 0;

        for flow in flows {
            let result = sqlx::query(
                "UPDATE money_flows SET starting_date = ?, last_checked_date = ?, period_days = ? WHERE id = ?",
            )
            .bind(flow.starting_date)
            .bind(flow.last_checked_date)
            .bind(flow.period_days)
            .bind(flow.id.to_string())
            .execute(&mut *conn)
            .await?;

            updated += result.rows_affected();
        }

        Ok(updated)
    }

    /// Delete a money flow. Returns false when there is none.
    pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM money_flows WHERE id = ?")
            .bind(id.to_string())
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flows due on `today`: never checked with a starting date that has
    /// arrived, or checked with `last_checked_date + period <= today`.
    pub async fn get_on_time_flows(
        conn: &mut SqliteConnection,
        today: NaiveDate,
    ) -> Result<Vec<MoneyFlowDetails>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT mf.id, mf.account_id, mf.category_id, mf.sum, mf.starting_date,
                   mf.last_checked_date, mf.period_days,
                   a.basis_sum AS account_basis_sum,
                   c.account_id AS category_account_id,
                   c.name AS category_name,
                   c.category_type AS category_type
            FROM money_flows mf
            JOIN accounts a ON a.id = mf.account_id
            LEFT JOIN categories c ON c.id = mf.category_id
            WHERE (mf.last_checked_date IS NULL AND mf.starting_date <= ?)
               OR (mf.last_checked_date IS NOT NULL
                   AND date(mf.last_checked_date, '+' || mf.period_days || ' days') <= ?)
            ORDER BY mf.starting_date, mf.id
            "#,
        )
        .bind(today)
        .bind(today)
        .fetch_all(conn)
        .await?;

        rows.iter().map(Self::details_from_row).collect()
    }

    fn from_row(row: &SqliteRow) -> Result<MoneyFlow, StoreError> {
        Ok(MoneyFlow {
            id: parse_column(row, TABLE, "id")?,
            account_id: parse_column(row, TABLE, "account_id")?,
            category_id: parse_optional_column(row, TABLE, "category_id")?,
            sum: parse_column(row, TABLE, "sum")?,
            starting_date: parse_column(row, TABLE, "starting_date")?,
            last_checked_date: parse_optional_column(row, TABLE, "last_checked_date")?,
            period_days: row.try_get("period_days")?,
        })
    }

    fn details_from_row(row: &SqliteRow) -> Result<MoneyFlowDetails, StoreError> {
        let flow = Self::from_row(row)?;

        let account = Account {
            id: flow.account_id,
            basis_sum: parse_column(row, "accounts", "account_basis_sum")?,
        };

        // a dangling category reference leaves the joined columns null
        let category = match flow.category_id {
            Some(category_id) => {
                let name: Option<String> = row.try_get("category_name")?;
                match name {
                    Some(name) => Some(Category {
                        id: category_id,
                        account_id: parse_column(row, "categories", "category_account_id")?,
                        name,
                        category_type: parse_column(row, "categories", "category_type")?,
                    }),
                    None => None,
                }
            }
            None => None,
        };

        Ok(MoneyFlowDetails { flow, account, category })
    }
}
