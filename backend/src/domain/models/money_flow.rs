use uuid::Uuid;

use super::{Account, AccountEntry, PeriodicalSchedule, Transaction};
use crate::clock::Clock;
use crate::domain::DomainError;

/// Recurring transaction template bound to a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyFlow {
    id: Uuid,
    account_id: Uuid,
    transaction: Transaction,
    schedule: PeriodicalSchedule,
}

impl MoneyFlow {
    pub fn create(id: Uuid, account: &Account, transaction: Transaction, schedule: PeriodicalSchedule) -> Self {
        Self {
            id,
            account_id: account.id(),
            transaction,
            schedule,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn schedule(&self) -> &PeriodicalSchedule {
        &self.schedule
    }

    /// Entry for the schedule's next check date, carrying this flow's
    /// transaction.
    pub fn next_entry(&self, entry_id: Uuid, account: &Account, clock: &dyn Clock) -> Result<AccountEntry, DomainError> {
        if account.id() != self.account_id {
            return Err(DomainError::AccountMismatch {
                expected: self.account_id,
                actual: account.id(),
            });
        }

        AccountEntry::create(entry_id, self.schedule.next_check_date(), self.transaction, account, clock)
    }

    /// This flow with its schedule advanced one period, or `None` if it is
    /// not due.
    #[must_use]
    pub fn try_mark_processed(&self, clock: &dyn Clock) -> Option<Self> {
        let schedule = self.schedule.try_mark_checked(clock)?;

        Some(Self { schedule, ..*self })
    }
}
