//! Turns due money flows into ledger entries.

use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::models::{Account, AccountEntry, MoneyFlow};
use crate::domain::DomainError;

/// A flow advanced by one period together with the entry it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntry {
    pub money_flow: MoneyFlow,
    pub entry: AccountEntry,
}

/// Produce the next entry for `flow` and advance its schedule.
///
/// The entry is dated on the schedule's next check date, not today. Returns
/// `Ok(None)` when the flow turns out not to be due.
pub fn generate_next_entry(
    flow: &MoneyFlow,
    account: &Account,
    clock: &dyn Clock,
) -> Result<Option<GeneratedEntry>, DomainError> {
    let Some(money_flow) = flow.try_mark_processed(clock) else {
        return Ok(None);
    };

    let entry = flow.next_entry(Uuid::new_v4(), account, clock)?;

    Ok(Some(GeneratedEntry { money_flow, entry }))
}

/// Run [`generate_next_entry`] over every (flow, owning account) pair,
/// dropping the flows that are not due.
pub fn generate_next_entries<I>(flows: I, clock: &dyn Clock) -> Result<Vec<GeneratedEntry>, DomainError>
where
    I: IntoIterator<Item = (MoneyFlow, Account)>,
{
    flows
        .into_iter()
        .filter_map(|(flow, account)| generate_next_entry(&flow, &account, clock).transpose())
        .collect()
}
