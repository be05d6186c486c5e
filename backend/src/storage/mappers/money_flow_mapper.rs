use crate::clock::Clock;
use crate::domain::models::{Account, Category, Money, MoneyFlow, Period, PeriodicalSchedule, Transaction};
use crate::domain::DomainError;
use crate::storage::repositories::MoneyFlowDetails;

use super::{check_account, check_category, AccountMapper, CategoryMapper};

pub struct MoneyFlowMapper;

impl MoneyFlowMapper {
    /// Rebuild a flow from its record, the owning account and the category
    /// the record refers to. The stored schedule is validated against `clock`.
    pub fn to_domain(
        record: &shared::MoneyFlow,
        account: &Account,
        category: Option<&Category>,
        clock: &dyn Clock,
    ) -> Result<MoneyFlow, DomainError> {
        check_account(record.account_id, account)?;
        check_category(record.category_id, category, account)?;

        let transaction = Transaction::create(Money::new(record.sum), category)?;
        let period = Period::from_days(record.period_days)?;
        let schedule = PeriodicalSchedule::existing(record.starting_date, record.last_checked_date, period, clock)?;

        Ok(MoneyFlow::create(record.id, account, transaction, schedule))
    }

    /// Convert a joined on-time row into the flow and its owning account
    pub fn details_to_domain(details: &MoneyFlowDetails, clock: &dyn Clock) -> Result<(MoneyFlow, Account), DomainError> {
        let account = AccountMapper::to_domain(&details.account);
        let category = details.category.as_ref().map(CategoryMapper::to_domain).transpose()?;

        let flow = Self::to_domain(&details.flow, &account, category.as_ref(), clock)?;
        Ok((flow, account))
    }

    pub fn to_dto(flow: &MoneyFlow) -> shared::MoneyFlow {
        let schedule = flow.schedule();
        shared::MoneyFlow {
            id: flow.id(),
            account_id: flow.account_id(),
            category_id: flow.transaction().category_id(),
            sum: flow.transaction().sum().amount(),
            starting_date: schedule.starting_date(),
            last_checked_date: schedule.last_checked_date(),
            period_days: schedule.period().days(),
        }
    }
}
