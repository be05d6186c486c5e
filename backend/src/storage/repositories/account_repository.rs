use shared::Account;
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::parse_column;
use crate::storage::StoreError;

const TABLE: &str = "accounts";

pub struct AccountRepository;

impl AccountRepository {
    /// Store an account in the database
    pub async fn insert(conn: &mut SqliteConnection, account: &Account) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO accounts (id, basis_sum) VALUES (?, ?)")
            .bind(account.id.to_string())
            .bind(account.basis_sum.to_string())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Get an account by ID
    pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT id, basis_sum FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(conn)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Check whether an account with this ID exists
    pub async fn exists(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(conn)
            .await?;
        Ok(found.is_some())
    }

    fn from_row(row: &SqliteRow) -> Result<Account, StoreError> {
        Ok(Account {
            id: parse_column(row, TABLE, "id")?,
            basis_sum: parse_column(row, TABLE, "basis_sum")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let mut conn = db.pool().acquire().await.unwrap();

        let account = Account {
            id: Uuid::new_v4(),
            basis_sum: Decimal::new(-12345, 2),
        };
        AccountRepository::insert(&mut conn, &account).await.unwrap();

        let loaded = AccountRepository::get(&mut conn, account.id).await.unwrap();
        assert_eq!(loaded, Some(account.clone()));
        assert!(AccountRepository::exists(&mut conn, account.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let mut conn = db.pool().acquire().await.unwrap();

        assert_eq!(AccountRepository::get(&mut conn, Uuid::new_v4()).await.unwrap(), None);
        assert!(!AccountRepository::exists(&mut conn, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_basis_sum_is_reported() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let mut conn = db.pool().acquire().await.unwrap();
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO accounts (id, basis_sum) VALUES (?, 'lots')")
            .bind(id.to_string())
            .execute(&mut *conn)
            .await
            .unwrap();

        let result = AccountRepository::get(&mut conn, id).await;
        assert!(matches!(result, Err(StoreError::CorruptRow { table: "accounts", .. })));
    }
}
