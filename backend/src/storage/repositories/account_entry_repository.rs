use shared::{AccountEntry, AccountEntryFilter};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{parse_column, parse_optional_column};
use crate::storage::StoreError;

const TABLE: &str = "account_entries";

pub struct AccountEntryRepository;

impl AccountEntryRepository {
    /// Store an entry in the database
    pub async fn insert(conn: &mut SqliteConnection, entry: &AccountEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO account_entries (id, date, sum, category_id, account_id) VALUES (?, ?, ?, ?, ?)")
            .bind(entry.id.to_string())
            .bind(entry.date)
            .bind(entry.sum.to_string())
            .bind(entry.category_id.map(|id| id.to_string()))
            .bind(entry.account_id.to_string())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Store several entries in the caller's transaction
    pub async fn insert_many(conn: &mut SqliteConnection, entries: &[AccountEntry]) -> Result<(), StoreError> {
        for entry in entries {
            Self::insert(&mut *conn, entry).await?;
        }
        Ok(())
    }

    /// Get an entry by ID
    pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<AccountEntry>, StoreError> {
        let row = sqlx::query("SELECT id, date, sum, category_id, account_id FROM account_entries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(conn)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Entries of an account ordered by date, narrowed by the optional
    /// inclusive date span and category
    pub async fn list_by_account(
        conn: &mut SqliteConnection,
        account_id: Uuid,
        filter: &AccountEntryFilter,
    ) -> Result<Vec<AccountEntry>, StoreError> {
        let category_id = filter.category_id.map(|id| id.to_string());

        let rows = sqlx::query(
            r#"
            SELECT id, date, sum, category_id, account_id
            FROM account_entries
            WHERE account_id = ?
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
              AND (? IS NULL OR category_id = ?)
            ORDER BY date, id
            "#,
        )
        .bind(account_id.to_string())
        .bind(filter.start_date)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.end_date)
        .bind(category_id.clone())
        .bind(category_id)
        .fetch_all(conn)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    /// Overwrite an existing entry. Returns false when there is none.
    pub async fn replace(conn: &mut SqliteConnection, entry: &AccountEntry) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE account_entries SET date = ?, sum = ?, category_id = ?, account_id = ? WHERE id = ?",
        )
        .bind(entry.date)
        .bind(entry.sum.to_string())
        .bind(entry.category_id.map(|id| id.to_string()))
        .bind(entry.account_id.to_string())
        .bind(entry.id.to_string())
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an entry. Returns false when there is none.
    pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM account_entries WHERE id = ?")
            .bind(id.to_string())
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn from_row(row: &SqliteRow) -> Result<AccountEntry, StoreError> {
        Ok(AccountEntry {
            id: parse_column(row, TABLE, "id")?,
            date: parse_column(row, TABLE, "date")?,
            sum: parse_column(row, TABLE, "sum")?,
            category_id: parse_optional_column(row, TABLE, "category_id")?,
            account_id: parse_column(row, TABLE, "account_id")?,
        })
    }
}
