use shared::{CategoryType, CreateCategoryRequest};
use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use crate::domain::account_service::load_account;
use crate::domain::models::{Account, Category};
use crate::domain::ServiceError;
use crate::storage::mappers::CategoryMapper;
use crate::storage::repositories::CategoryRepository;
use crate::storage::TransactionalExecutor;

/// Service for the income and expense categories of an account
#[derive(Clone)]
pub struct CategoryService {
    executor: TransactionalExecutor,
}

impl CategoryService {
    pub fn new(executor: TransactionalExecutor) -> Self {
        Self { executor }
    }

    pub async fn create_category(
        &self,
        account_id: Uuid,
        request: CreateCategoryRequest,
    ) -> Result<shared::Category, ServiceError> {
        info!("Creating category for account {}: {:?}", account_id, request);

        // validate before touching the store
        let category = Category::create(Uuid::new_v4(), account_id, request.name, request.category_type)?;
        let record = CategoryMapper::to_dto(&category);

        let created = self
            .executor
            .execute_and_commit(move |conn| {
                let record = record.clone();
                Box::pin(async move {
                    load_account(&mut *conn, account_id).await?;
                    CategoryRepository::insert(&mut *conn, &record).await?;
                    Ok::<_, ServiceError>(record)
                })
            })
            .await?;

        info!("Successfully created category {}", created.id);
        Ok(created)
    }

    pub async fn get_category(&self, account_id: Uuid, category_id: Uuid) -> Result<shared::Category, ServiceError> {
        self.executor
            .execute_readonly(move |conn| {
                Box::pin(async move {
                    let record = CategoryRepository::get(conn, category_id)
                        .await?
                        .ok_or_else(|| ServiceError::NotFound(format!("Category {}", category_id)))?;

                    if record.account_id != account_id {
                        return Err(ServiceError::Forbidden(format!("Category {}", category_id)));
                    }

                    Ok(record)
                })
            })
            .await
    }

    /// Categories of an account, all of them or only one type
    pub async fn list_categories(
        &self,
        account_id: Uuid,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<shared::Category>, ServiceError> {
        self.executor
            .execute_readonly(move |conn| {
                Box::pin(async move {
                    load_account(&mut *conn, account_id).await?;
                    let categories = CategoryRepository::list_by_account(&mut *conn, account_id, category_type).await?;
                    Ok(categories)
                })
            })
            .await
    }
}

/// Resolve an optional category reference of `account`.
///
/// A missing category is `NotFound`; one owned by another account is
/// `Forbidden`.
pub(crate) async fn load_category(
    conn: &mut SqliteConnection,
    account: &Account,
    category_id: Option<Uuid>,
) -> Result<Option<Category>, ServiceError> {
    let Some(category_id) = category_id else {
        return Ok(None);
    };

    let record = CategoryRepository::get(conn, category_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Category {}", category_id)))?;

    if record.account_id != account.id() {
        return Err(ServiceError::Forbidden(format!("Category {}", category_id)));
    }

    Ok(Some(CategoryMapper::to_domain(&record)?))
}
