use shared::{Category, CategoryType};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::parse_column;
use crate::storage::StoreError;

const TABLE: &str = "categories";

pub struct CategoryRepository;

impl CategoryRepository {
    /// Store a category in the database
    pub async fn insert(conn: &mut SqliteConnection, category: &Category) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO categories (id, account_id, name, category_type) VALUES (?, ?, ?, ?)")
            .bind(category.id.to_string())
            .bind(category.account_id.to_string())
            .bind(category.name.as_str())
            .bind(category.category_type.as_str())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Get a category by ID
    pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, account_id, name, category_type FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(conn)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Categories of an account, optionally only those of one type, by name
    pub async fn list_by_account(
        conn: &mut SqliteConnection,
        account_id: Uuid,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>, StoreError> {
        let type_filter = category_type.map(|t| t.as_str());

        let rows = sqlx::query(
            r#"
            SELECT id, account_id, name, category_type
            FROM categories
            WHERE account_id = ? AND (? IS NULL OR category_type = ?)
            ORDER BY name, id
            "#,
        )
        .bind(account_id.to_string())
        .bind(type_filter)
        .bind(type_filter)
        .fetch_all(conn)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    fn from_row(row: &SqliteRow) -> Result<Category, StoreError> {
        Ok(Category {
            id: parse_column(row, TABLE, "id")?,
            account_id: parse_column(row, TABLE, "account_id")?,
            name: row.try_get("name")?,
            category_type: parse_column(row, TABLE, "category_type")?,
        })
    }
}
