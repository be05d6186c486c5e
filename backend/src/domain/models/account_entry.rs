use chrono::NaiveDate;
use uuid::Uuid;

use super::{Account, Transaction};
use crate::clock::Clock;
use crate::domain::DomainError;

/// A single materialized ledger transaction on a given day.
///
/// Entries are never edited in place; an update replaces the whole entry
/// under the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountEntry {
    id: Uuid,
    date: NaiveDate,
    transaction: Transaction,
    account_id: Uuid,
}

impl AccountEntry {
    pub fn create(
        id: Uuid,
        date: NaiveDate,
        transaction: Transaction,
        account: &Account,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let today = clock.today_utc();

        if date > today {
            return Err(DomainError::EntryInFuture { date, today });
        }

        Ok(Self {
            id,
            date,
            transaction,
            account_id: account.id(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::models::Money;
    use rust_decimal::Decimal;

    fn setup() -> (Account, Transaction, ManualClock, NaiveDate) {
        let today = NaiveDate::from_ymd_opt(2025, 5, 30).unwrap();
        let account = Account::create(Uuid::new_v4(), Money::ZERO);
        let transaction = Transaction::create(Money::new(Decimal::from(-12)), None).unwrap();
        (account, transaction, ManualClock::at_date(today), today)
    }

    #[test]
    fn test_entry_dated_today_or_earlier() {
        let (account, transaction, clock, today) = setup();

        let entry = AccountEntry::create(Uuid::new_v4(), today, transaction, &account, &clock).unwrap();
        assert_eq!(entry.date(), today);
        assert_eq!(entry.account_id(), account.id());

        let yesterday = today.pred_opt().unwrap();
        assert!(AccountEntry::create(Uuid::new_v4(), yesterday, transaction, &account, &clock).is_ok());
    }

    #[test]
    fn test_entry_in_future_fails() {
        let (account, transaction, clock, today) = setup();
        let tomorrow = today.succ_opt().unwrap();

        let result = AccountEntry::create(Uuid::new_v4(), tomorrow, transaction, &account, &clock);
        assert_eq!(
            result,
            Err(DomainError::EntryInFuture {
                date: tomorrow,
                today
            })
        );
    }
}
