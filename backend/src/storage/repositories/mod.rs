//! SQL repositories. Every function takes the `&mut SqliteConnection` of the
//! caller's transaction so that reads and writes share one isolation scope.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::fmt::Display;
use std::str::FromStr;

use super::StoreError;

pub mod account_entry_repository;
pub mod account_repository;
pub mod category_repository;
pub mod money_flow_repository;

pub use account_entry_repository::AccountEntryRepository;
pub use account_repository::AccountRepository;
pub use category_repository::CategoryRepository;
pub use money_flow_repository::{MoneyFlowDetails, MoneyFlowRepository};

/// Read a text column and parse it, reporting a corrupt row on failure
pub(crate) fn parse_column<T>(row: &SqliteRow, table: &'static str, column: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|err| corrupt_column(row, table, column, &raw, err))
}

/// Like [`parse_column`] for nullable columns
pub(crate) fn parse_optional_column<T>(
    row: &SqliteRow,
    table: &'static str,
    column: &str,
) -> Result<Option<T>, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| {
        raw.parse()
            .map_err(|err| corrupt_column(row, table, column, &raw, err))
    })
    .transpose()
}

fn corrupt_column(row: &SqliteRow, table: &'static str, column: &str, raw: &str, err: impl Display) -> StoreError {
    let id: String = row.try_get("id").unwrap_or_default();
    StoreError::corrupt(table, id, format!("invalid {} '{}': {}", column, raw, err))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{Account, Category, CategoryType};
    use sqlx::SqliteConnection;
    use uuid::Uuid;

    use super::{AccountRepository, CategoryRepository};

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub async fn seed_account(conn: &mut SqliteConnection) -> Account {
        let account = Account {
            id: Uuid::new_v4(),
            basis_sum: Decimal::new(10000, 2),
        };
        AccountRepository::insert(conn, &account).await.expect("Failed to insert account");
        account
    }

    pub async fn seed_category(conn: &mut SqliteConnection, account_id: Uuid, category_type: CategoryType) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            account_id,
            name: format!("{} category", category_type),
            category_type,
        };
        CategoryRepository::insert(conn, &category).await.expect("Failed to insert category");
        category
    }
}
