//! Ledger entries of an account: manual CRUD on top of the entries the
//! scheduler materializes from money flows.
//!
//! Every write re-runs the full domain validation: the sum must be non-zero
//! and agree in sign with the category, the category must belong to the
//! account, and the date may not lie in the future.

use shared::{AccountEntryFilter, CreateAccountEntryRequest};
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::account_service::load_account;
use crate::domain::category_service::load_category;
use crate::domain::models::{AccountEntry, Money, Transaction};
use crate::domain::ServiceError;
use crate::storage::mappers::AccountEntryMapper;
use crate::storage::repositories::{AccountEntryRepository, AccountRepository};
use crate::storage::TransactionalExecutor;

#[derive(Clone)]
pub struct AccountEntryService {
    executor: TransactionalExecutor,
    clock: Arc<dyn Clock>,
}

impl AccountEntryService {
    pub fn new(executor: TransactionalExecutor, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }

    pub async fn create_entry(
        &self,
        account_id: Uuid,
        request: CreateAccountEntryRequest,
    ) -> Result<shared::AccountEntry, ServiceError> {
        info!("Creating entry for account {}: {:?}", account_id, request);
        let entry_id = Uuid::new_v4();
        let clock = self.clock.clone();

        let entry = self
            .executor
            .execute_and_commit(move |conn| {
                let clock = clock.clone();
                let request = request.clone();
                Box::pin(async move {
                    let record = build_entry(&mut *conn, entry_id, account_id, &request, clock.as_ref()).await?;
                    AccountEntryRepository::insert(&mut *conn, &record).await?;
                    Ok::<_, ServiceError>(record)
                })
            })
            .await?;

        info!("Successfully created entry {}", entry.id);
        Ok(entry)
    }

    pub async fn get_entry(&self, account_id: Uuid, entry_id: Uuid) -> Result<shared::AccountEntry, ServiceError> {
        self.executor
            .execute_readonly(move |conn| Box::pin(async move { load_owned_entry(conn, account_id, entry_id).await }))
            .await
    }

    /// Entries of an account by date, optionally within an inclusive date
    /// span and for one category only
    pub async fn list_entries(
        &self,
        account_id: Uuid,
        filter: AccountEntryFilter,
    ) -> Result<Vec<shared::AccountEntry>, ServiceError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(ServiceError::InvalidRequest(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }

        self.executor
            .execute_readonly(move |conn| {
                let filter = filter.clone();
                Box::pin(async move {
                    if !AccountRepository::exists(&mut *conn, account_id).await? {
                        return Err(ServiceError::NotFound(format!("Account {}", account_id)));
                    }

                    let entries = AccountEntryRepository::list_by_account(&mut *conn, account_id, &filter).await?;
                    Ok(entries)
                })
            })
            .await
    }

    /// Replace an entry in place, keeping its id
    pub async fn replace_entry(
        &self,
        account_id: Uuid,
        entry_id: Uuid,
        request: CreateAccountEntryRequest,
    ) -> Result<shared::AccountEntry, ServiceError> {
        info!("Replacing entry {} of account {}: {:?}", entry_id, account_id, request);
        let clock = self.clock.clone();

        self.executor
            .execute_and_commit(move |conn| {
                let clock = clock.clone();
                let request = request.clone();
                Box::pin(async move {
                    load_owned_entry(&mut *conn, account_id, entry_id).await?;

                    let record = build_entry(&mut *conn, entry_id, account_id, &request, clock.as_ref()).await?;
                    AccountEntryRepository::replace(&mut *conn, &record).await?;
                    Ok(record)
                })
            })
            .await
    }

    pub async fn delete_entry(&self, account_id: Uuid, entry_id: Uuid) -> Result<(), ServiceError> {
        info!("Deleting entry {} of account {}", entry_id, account_id);

        self.executor
            .execute_and_commit(move |conn| {
                Box::pin(async move {
                    load_owned_entry(&mut *conn, account_id, entry_id).await?;
                    AccountEntryRepository::delete(&mut *conn, entry_id).await?;
                    Ok(())
                })
            })
            .await
    }
}

/// Validate a request into an entry record of `account_id`
async fn build_entry(
    conn: &mut SqliteConnection,
    entry_id: Uuid,
    account_id: Uuid,
    request: &CreateAccountEntryRequest,
    clock: &dyn Clock,
) -> Result<shared::AccountEntry, ServiceError> {
    let account = load_account(&mut *conn, account_id).await?;
    let category = load_category(&mut *conn, &account, request.category_id).await?;

    let transaction = Transaction::create(Money::new(request.sum), category.as_ref())?;
    let entry = AccountEntry::create(entry_id, request.date, transaction, &account, clock)?;

    Ok(AccountEntryMapper::to_dto(&entry))
}

async fn load_owned_entry(
    conn: &mut SqliteConnection,
    account_id: Uuid,
    entry_id: Uuid,
) -> Result<shared::AccountEntry, ServiceError> {
    let record = AccountEntryRepository::get(conn, entry_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Entry {}", entry_id)))?;

    if record.account_id != account_id {
        return Err(ServiceError::Forbidden(format!("Entry {}", entry_id)));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::{AccountService, CategoryService, DomainError};
    use crate::storage::{DbConnection, RetryPolicy};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{CategoryType, CreateAccountRequest, CreateCategoryRequest};

    struct TestContext {
        service: AccountEntryService,
        categories: CategoryService,
        account_id: Uuid,
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    async fn setup_test() -> TestContext {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let executor = TransactionalExecutor::new(db, RetryPolicy::default());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::at_date(date(15)));

        let account_id = Uuid::new_v4();
        AccountService::new(executor.clone())
            .create_account(account_id, CreateAccountRequest { basis_sum: Decimal::ZERO })
            .await
            .expect("Failed to create account");

        TestContext {
            service: AccountEntryService::new(executor.clone(), clock),
            categories: CategoryService::new(executor),
            account_id,
        }
    }

    async fn category(ctx: &TestContext, account_id: Uuid, category_type: CategoryType) -> shared::Category {
        ctx.categories
            .create_category(
                account_id,
                CreateCategoryRequest {
                    name: format!("{}", category_type),
                    category_type,
                },
            )
            .await
            .expect("Failed to create category")
    }

    fn request(cents: i64, day: u32, category_id: Option<Uuid>) -> CreateAccountEntryRequest {
        CreateAccountEntryRequest {
            sum: Decimal::new(cents, 2),
            date: date(day),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_get_and_list_entries() {
        let ctx = setup_test().await;
        let groceries = category(&ctx, ctx.account_id, CategoryType::Expense).await;

        let early = ctx.service.create_entry(ctx.account_id, request(-2599, 2, Some(groceries.id))).await.unwrap();
        let late = ctx.service.create_entry(ctx.account_id, request(100000, 14, None)).await.unwrap();

        assert_eq!(ctx.service.get_entry(ctx.account_id, early.id).await.unwrap(), early);

        let all = ctx.service.list_entries(ctx.account_id, AccountEntryFilter::default()).await.unwrap();
        assert_eq!(all, vec![early.clone(), late]);

        let only_groceries = AccountEntryFilter {
            category_id: Some(groceries.id),
            ..AccountEntryFilter::default()
        };
        let filtered = ctx.service.list_entries(ctx.account_id, only_groceries).await.unwrap();
        assert_eq!(filtered, vec![early]);
    }

    #[tokio::test]
    async fn test_create_entry_validation() {
        let ctx = setup_test().await;
        let salary = category(&ctx, ctx.account_id, CategoryType::Income).await;

        let zero = ctx.service.create_entry(ctx.account_id, request(0, 2, None)).await;
        assert!(matches!(zero, Err(ServiceError::Validation(DomainError::ZeroAmount))));

        let wrong_sign = ctx.service.create_entry(ctx.account_id, request(-100, 2, Some(salary.id))).await;
        assert!(matches!(
            wrong_sign,
            Err(ServiceError::Validation(DomainError::ExpenseCategoryRequired))
        ));

        let future = ctx.service.create_entry(ctx.account_id, request(100, 16, None)).await;
        assert!(matches!(
            future,
            Err(ServiceError::Validation(DomainError::EntryInFuture { .. }))
        ));

        let missing_category = ctx.service.create_entry(ctx.account_id, request(100, 2, Some(Uuid::new_v4()))).await;
        assert!(matches!(missing_category, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_category_of_another_account_is_forbidden() {
        let ctx = setup_test().await;

        let stranger_id = Uuid::new_v4();
        AccountService::new(ctx.service.executor.clone())
            .create_account(stranger_id, CreateAccountRequest { basis_sum: Decimal::ZERO })
            .await
            .unwrap();
        let foreign = category(&ctx, stranger_id, CategoryType::Income).await;

        let result = ctx.service.create_entry(ctx.account_id, request(100, 2, Some(foreign.id))).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_replace_and_delete_entry() {
        let ctx = setup_test().await;
        let entry = ctx.service.create_entry(ctx.account_id, request(500, 3, None)).await.unwrap();

        let replaced = ctx
            .service
            .replace_entry(ctx.account_id, entry.id, request(-750, 4, None))
            .await
            .unwrap();
        assert_eq!(replaced.id, entry.id);
        assert_eq!(replaced.sum, Decimal::new(-750, 2));
        assert_eq!(ctx.service.get_entry(ctx.account_id, entry.id).await.unwrap(), replaced);

        ctx.service.delete_entry(ctx.account_id, entry.id).await.unwrap();
        let result = ctx.service.get_entry(ctx.account_id, entry.id).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_entries_of_another_account_are_forbidden() {
        let ctx = setup_test().await;
        let entry = ctx.service.create_entry(ctx.account_id, request(500, 3, None)).await.unwrap();
        let stranger = Uuid::new_v4();

        assert!(matches!(
            ctx.service.get_entry(stranger, entry.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.service.delete_entry(stranger, entry.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.service.replace_entry(stranger, entry.id, request(1, 3, None)).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_span() {
        let ctx = setup_test().await;
        let filter = AccountEntryFilter {
            start_date: Some(date(10)),
            end_date: Some(date(9)),
            category_id: None,
        };

        let result = ctx.service.list_entries(ctx.account_id, filter).await;
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }
}
