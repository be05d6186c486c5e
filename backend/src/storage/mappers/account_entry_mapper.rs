use crate::clock::Clock;
use crate::domain::models::{Account, AccountEntry, Category, Money, Transaction};
use crate::domain::DomainError;

use super::{check_account, check_category};

pub struct AccountEntryMapper;

impl AccountEntryMapper {
    /// Rebuild an entry from its record, the owning account and the
    /// category the record refers to
    pub fn to_domain(
        record: &shared::AccountEntry,
        account: &Account,
        category: Option<&Category>,
        clock: &dyn Clock,
    ) -> Result<AccountEntry, DomainError> {
        check_account(record.account_id, account)?;
        check_category(record.category_id, category, account)?;

        let transaction = Transaction::create(Money::new(record.sum), category)?;
        AccountEntry::create(record.id, record.date, transaction, account, clock)
    }

    pub fn to_dto(entry: &AccountEntry) -> shared::AccountEntry {
        shared::AccountEntry {
            id: entry.id(),
            date: entry.date(),
            sum: entry.transaction().sum().amount(),
            category_id: entry.transaction().category_id(),
            account_id: entry.account_id(),
        }
    }
}
