//! # Money Flow Job
//!
//! One tick materializes the next entry of every due money flow:
//!
//! 1. fetch the flows that are on time today, joined with their account and
//!    optional category
//! 2. rebuild them as domain objects
//! 3. advance each schedule one period and produce its entry
//! 4. write back the schedules and insert the entries
//!
//! All four steps run as a single unit of work in the transactional
//! executor. Two pollers racing on the same flow conflict in the store; the
//! loser retries, finds the flow already advanced and produces nothing.

use async_trait::async_trait;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Job, JobError, Shutdown};
use crate::clock::Clock;
use crate::domain::generate_next_entries;
use crate::domain::models::{Account, MoneyFlow};
use crate::storage::mappers::{AccountEntryMapper, MoneyFlowMapper};
use crate::storage::repositories::{AccountEntryRepository, MoneyFlowRepository};
use crate::storage::{StoreError, TransactionalExecutor};

pub struct MoneyFlowJob {
    executor: TransactionalExecutor,
    clock: Arc<dyn Clock>,
}

impl MoneyFlowJob {
    pub fn new(executor: TransactionalExecutor, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }

    /// Run one tick. Returns how many entries were created.
    pub async fn process_due_flows(&self) -> Result<usize, StoreError> {
        let clock = self.clock.clone();

        self.executor
            .execute_and_commit(move |conn| {
                let clock = clock.clone();
                Box::pin(async move { materialize_due_flows(conn, clock.as_ref()).await })
            })
            .await
    }
}

async fn materialize_due_flows(conn: &mut SqliteConnection, clock: &dyn Clock) -> Result<usize, StoreError> {
    let today = clock.today_utc();

    let due = MoneyFlowRepository::get_on_time_flows(&mut *conn, today).await?;
    debug!("Found {} money flows on time for {}", due.len(), today);

    // a flow that no longer passes validation must not hold back the others
    let flows: Vec<(MoneyFlow, Account)> = due
        .iter()
        .filter_map(|details| match MoneyFlowMapper::details_to_domain(details, clock) {
            Ok(pair) => Some(pair),
            Err(err) => {
                warn!("Skipping money flow {}: {}", details.flow.id, err);
                None
            }
        })
        .collect();

    let generated = generate_next_entries(flows, clock)?;
    if generated.is_empty() {
        return Ok(0);
    }

    let advanced: Vec<shared::MoneyFlow> = generated
        .iter()
        .map(|pair| MoneyFlowMapper::to_dto(&pair.money_flow))
        .collect();
    let entries: Vec<shared::AccountEntry> = generated
        .iter()
        .map(|pair| AccountEntryMapper::to_dto(&pair.entry))
        .collect();

    MoneyFlowRepository::update_schedules(&mut *conn, &advanced).await?;
    AccountEntryRepository::insert_many(&mut *conn, &entries).await?;

    Ok(entries.len())
}

#[async_trait]
impl Job for MoneyFlowJob {
    fn name(&self) -> &str {
        "money-flows"
    }

    async fn execute(&self, shutdown: &Shutdown) -> Result<(), JobError> {
        if shutdown.is_requested() {
            return Err(JobError::Cancelled);
        }

        let created = self
            .process_due_flows()
            .await
            .map_err(|err| JobError::Failed(err.into()))?;

        if created > 0 {
            info!("Created {} account entries from money flows", created);
        } else {
            debug!("No money flows due");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::{AccountService, MoneyFlowService};
    use crate::jobs::shutdown_channel;
    use crate::storage::{DbConnection, RetryPolicy};
    use chrono::{Days, NaiveDate};
    use rust_decimal::Decimal;
    use shared::{AccountEntryFilter, CreateAccountRequest, CreateMoneyFlowRequest, PeriodType};
    use uuid::Uuid;

    struct TestContext {
        executor: TransactionalExecutor,
        clock: Arc<ManualClock>,
        job: MoneyFlowJob,
        account_id: Uuid,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 30).unwrap()
    }

    fn plus(days: u64) -> NaiveDate {
        today().checked_add_days(Days::new(days)).unwrap()
    }

    async fn setup_with(db: DbConnection) -> TestContext {
        let executor = TransactionalExecutor::new(db, RetryPolicy::default());
        let clock = Arc::new(ManualClock::at_date(today()));

        let account_id = Uuid::new_v4();
        AccountService::new(executor.clone())
            .create_account(account_id, CreateAccountRequest { basis_sum: Decimal::ZERO })
            .await
            .expect("Failed to create account");

        TestContext {
            job: MoneyFlowJob::new(executor.clone(), clock.clone()),
            executor,
            clock,
            account_id,
        }
    }

    async fn setup_test() -> TestContext {
        setup_with(DbConnection::init_test().await.expect("Failed to create test database")).await
    }

    async fn create_flow(ctx: &TestContext, starting_date: NaiveDate, period: PeriodType) -> shared::MoneyFlow {
        MoneyFlowService::new(ctx.executor.clone(), ctx.clock.clone())
            .create_money_flow(
                ctx.account_id,
                CreateMoneyFlowRequest {
                    sum: Decimal::new(2500, 2),
                    starting_date,
                    period,
                    category_id: None,
                },
            )
            .await
            .expect("Failed to create money flow")
    }

    async fn entry_dates(ctx: &TestContext) -> Vec<NaiveDate> {
        let mut conn = ctx.executor.db().pool().acquire().await.unwrap();
        AccountEntryRepository::list_by_account(&mut conn, ctx.account_id, &AccountEntryFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.date)
            .collect()
    }

    async fn stored_flow(ctx: &TestContext, id: Uuid) -> shared::MoneyFlow {
        let mut conn = ctx.executor.db().pool().acquire().await.unwrap();
        MoneyFlowRepository::get(&mut conn, id).await.unwrap().expect("flow should exist")
    }

    #[tokio::test]
    async fn test_nothing_due_before_start() {
        let ctx = setup_test().await;
        create_flow(&ctx, plus(1), PeriodType::Daily).await;

        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 0);
        assert!(entry_dates(&ctx).await.is_empty());
    }

    #[tokio::test]
    async fn test_due_flow_creates_entry_and_advances() {
        let ctx = setup_test().await;
        let flow = create_flow(&ctx, plus(1), PeriodType::Weekly).await;

        ctx.clock.set_date(plus(1));
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);

        assert_eq!(entry_dates(&ctx).await, vec![plus(1)]);
        assert_eq!(stored_flow(&ctx, flow.id).await.last_checked_date, Some(plus(1)));

        // a second tick on the same day finds nothing due
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 0);
        assert_eq!(entry_dates(&ctx).await.len(), 1);

        ctx.clock.set_date(plus(8));
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);
        assert_eq!(entry_dates(&ctx).await, vec![plus(1), plus(8)]);
    }

    #[tokio::test]
    async fn test_missed_periods_catch_up_one_per_tick() {
        let ctx = setup_test().await;
        let flow = create_flow(&ctx, plus(1), PeriodType::Daily).await;

        ctx.clock.set_date(plus(3));

        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);
        assert_eq!(entry_dates(&ctx).await, vec![plus(1)]);
        assert_eq!(stored_flow(&ctx, flow.id).await.last_checked_date, Some(plus(1)));

        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 0);

        assert_eq!(entry_dates(&ctx).await, vec![plus(1), plus(2), plus(3)]);
    }

    #[tokio::test]
    async fn test_invalid_flow_is_skipped() {
        let ctx = setup_test().await;
        let healthy = create_flow(&ctx, plus(1), PeriodType::Daily).await;

        // checked one day into a weekly cadence, due again by the store's reckoning
        let broken = shared::MoneyFlow {
            id: Uuid::new_v4(),
            account_id: ctx.account_id,
            category_id: None,
            sum: Decimal::new(100, 0),
            starting_date: today().checked_sub_days(Days::new(10)).unwrap(),
            last_checked_date: Some(today().checked_sub_days(Days::new(9)).unwrap()),
            period_days: 7,
        };
        {
            let mut conn = ctx.executor.db().pool().acquire().await.unwrap();
            MoneyFlowRepository::insert(&mut conn, &broken).await.unwrap();
        }

        ctx.clock.set_date(plus(1));
        assert_eq!(ctx.job.process_due_flows().await.unwrap(), 1);

        assert_eq!(stored_flow(&ctx, healthy.id).await.last_checked_date, Some(plus(1)));
        assert_eq!(stored_flow(&ctx, broken.id).await, broken);
    }

    #[tokio::test]
    async fn test_execute_reports_cancellation() {
        let ctx = setup_test().await;
        let (trigger, shutdown) = shutdown_channel();

        ctx.job.execute(&shutdown).await.unwrap();

        trigger.trigger();
        assert!(matches!(ctx.job.execute(&shutdown).await, Err(JobError::Cancelled)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_pollers_create_one_entry() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("budget.db").display());

        let first = DbConnection::new(&url).await.expect("Failed to open database");
        let ctx = setup_with(first).await;
        let flow = create_flow(&ctx, plus(1), PeriodType::Daily).await;
        ctx.clock.set_date(plus(1));

        // a second poller with its own pool, as another process would have
        let second = DbConnection::new(&url).await.expect("Failed to open database");
        let rival = MoneyFlowJob::new(TransactionalExecutor::new(second, RetryPolicy::default()), ctx.clock.clone());

        let (a, b) = tokio::join!(ctx.job.process_due_flows(), rival.process_due_flows());
        let created = a.expect("first poller failed") + b.expect("second poller failed");

        assert_eq!(created, 1);
        assert_eq!(entry_dates(&ctx).await, vec![plus(1)]);
        assert_eq!(stored_flow(&ctx, flow.id).await.last_checked_date, Some(plus(1)));
    }
}
