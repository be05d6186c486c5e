//! Money flow service.
//!
//! Flows are created here with a pending schedule and afterwards only
//! advanced by the scheduler.

use shared::CreateMoneyFlowRequest;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::account_service::load_account;
use crate::domain::category_service::load_category;
use crate::domain::models::{Money, MoneyFlow, Period, PeriodicalSchedule, Transaction};
use crate::domain::ServiceError;
use crate::storage::mappers::MoneyFlowMapper;
use crate::storage::repositories::MoneyFlowRepository;
use crate::storage::TransactionalExecutor;

#[derive(Clone)]
pub struct MoneyFlowService {
    executor: TransactionalExecutor,
    clock: Arc<dyn Clock>,
}

impl MoneyFlowService {
    pub fn new(executor: TransactionalExecutor, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }

    /// Create a flow whose first entry falls on its starting date, which
    /// must be tomorrow or later
    pub async fn create_money_flow(
        &self,
        account_id: Uuid,
        request: CreateMoneyFlowRequest,
    ) -> Result<shared::MoneyFlow, ServiceError> {
        info!("Creating money flow for account {}: {:?}", account_id, request);
        let flow_id = Uuid::new_v4();
        let clock = self.clock.clone();

        let flow = self
            .executor
            .execute_and_commit(move |conn| {
                let clock = clock.clone();
                let request = request.clone();
                Box::pin(async move {
                    let account = load_account(&mut *conn, account_id).await?;
                    let category = load_category(&mut *conn, &account, request.category_id).await?;

                    let transaction = Transaction::create(Money::new(request.sum), category.as_ref())?;
                    let schedule =
                        PeriodicalSchedule::new(request.starting_date, Period::from(request.period), clock.as_ref())?;
                    let flow = MoneyFlow::create(flow_id, &account, transaction, schedule);

                    let record = MoneyFlowMapper::to_dto(&flow);
                    MoneyFlowRepository::insert(&mut *conn, &record).await?;
                    Ok::<_, ServiceError>(record)
                })
            })
            .await?;

        info!("Successfully created money flow {}", flow.id);
        Ok(flow)
    }

    pub async fn get_money_flow(&self, account_id: Uuid, flow_id: Uuid) -> Result<shared::MoneyFlow, ServiceError> {
        self.executor
            .execute_readonly(move |conn| {
                Box::pin(async move {
                    let record = MoneyFlowRepository::get(conn, flow_id)
                        .await?
                        .ok_or_else(|| ServiceError::NotFound(format!("Money flow {}", flow_id)))?;

                    if record.account_id != account_id {
                        return Err(ServiceError::Forbidden(format!("Money flow {}", flow_id)));
                    }

                    Ok(record)
                })
            })
            .await
    }

    pub async fn list_money_flows(&self, account_id: Uuid) -> Result<Vec<shared::MoneyFlow>, ServiceError> {
        self.executor
            .execute_readonly(move |conn| {
                Box::pin(async move {
                    load_account(&mut *conn, account_id).await?;
                    let flows = MoneyFlowRepository::list_by_account(&mut *conn, account_id).await?;
                    Ok(flows)
                })
            })
            .await
    }

    /// Delete a flow. Entries it already produced stay in the ledger.
    pub async fn delete_money_flow(&self, account_id: Uuid, flow_id: Uuid) -> Result<(), ServiceError> {
        info!("Deleting money flow {} of account {}", flow_id, account_id);

        self.executor
            .execute_and_commit(move |conn| {
                Box::pin(async move {
                    let record = MoneyFlowRepository::get(&mut *conn, flow_id)
                        .await?
                        .ok_or_else(|| ServiceError::NotFound(format!("Money flow {}", flow_id)))?;

                    if record.account_id != account_id {
                        return Err(ServiceError::Forbidden(format!("Money flow {}", flow_id)));
                    }

                    MoneyFlowRepository::delete(&mut *conn, flow_id).await?;
                    Ok(())
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::{AccountService, CategoryService, DomainError};
    use crate::storage::{DbConnection, RetryPolicy};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{CategoryType, CreateAccountRequest, CreateCategoryRequest, PeriodType};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    async fn setup_test() -> (MoneyFlowService, TransactionalExecutor, Uuid) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let executor = TransactionalExecutor::new(db, RetryPolicy::default());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::at_date(date(10)));

        let account_id = Uuid::new_v4();
        AccountService::new(executor.clone())
            .create_account(account_id, CreateAccountRequest { basis_sum: Decimal::ZERO })
            .await
            .expect("Failed to create account");

        (MoneyFlowService::new(executor.clone(), clock), executor, account_id)
    }

    fn request(starting_day: u32, period: PeriodType, category_id: Option<Uuid>) -> CreateMoneyFlowRequest {
        CreateMoneyFlowRequest {
            sum: Decimal::new(-120000, 2),
            starting_date: date(starting_day),
            period,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_get_list_delete() {
        let (service, executor, account_id) = setup_test().await;
        let rent = CategoryService::new(executor)
            .create_category(
                account_id,
                CreateCategoryRequest {
                    name: "Rent".to_string(),
                    category_type: CategoryType::Expense,
                },
            )
            .await
            .unwrap();

        let flow = service
            .create_money_flow(account_id, request(11, PeriodType::Monthly, Some(rent.id)))
            .await
            .unwrap();
        assert_eq!(flow.starting_date, date(11));
        assert_eq!(flow.last_checked_date, None);
        assert_eq!(flow.period_days, 30);
        assert_eq!(flow.category_id, Some(rent.id));

        assert_eq!(service.get_money_flow(account_id, flow.id).await.unwrap(), flow);
        assert_eq!(service.list_money_flows(account_id).await.unwrap(), vec![flow.clone()]);

        service.delete_money_flow(account_id, flow.id).await.unwrap();
        assert!(matches!(
            service.get_money_flow(account_id, flow.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_flow_must_start_tomorrow_or_later() {
        let (service, _, account_id) = setup_test().await;

        let result = service.create_money_flow(account_id, request(10, PeriodType::Daily, None)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(DomainError::StartsTooEarly { .. }))
        ));
    }

    #[tokio::test]
    async fn test_flow_of_another_account_is_forbidden() {
        let (service, _, account_id) = setup_test().await;
        let flow = service
            .create_money_flow(account_id, request(12, PeriodType::Weekly, None))
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            service.get_money_flow(stranger, flow.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_money_flow(stranger, flow.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_flow_for_missing_account() {
        let (service, _, _) = setup_test().await;

        let result = service
            .create_money_flow(Uuid::new_v4(), request(12, PeriodType::Daily, None))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
