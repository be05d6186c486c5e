//! Conversions between persisted records and domain objects.
//!
//! Every `to_domain` re-runs the domain validation, so a record that would
//! not have been accepted on creation is rejected on the way back in too.

pub mod account_entry_mapper;
pub mod account_mapper;
pub mod category_mapper;
pub mod money_flow_mapper;

pub use account_entry_mapper::AccountEntryMapper;
pub use account_mapper::AccountMapper;
pub use category_mapper::CategoryMapper;
pub use money_flow_mapper::MoneyFlowMapper;

use uuid::Uuid;

use crate::domain::models::{Account, Category};
use crate::domain::DomainError;

/// The record's account reference must be the given account
pub(crate) fn check_account(record_account_id: Uuid, account: &Account) -> Result<(), DomainError> {
    if record_account_id != account.id() {
        return Err(DomainError::AccountMismatch {
            expected: account.id(),
            actual: record_account_id,
        });
    }
    Ok(())
}

/// The record's category reference must be the given category, which in
/// turn must belong to the account
pub(crate) fn check_category(
    record_category_id: Option<Uuid>,
    category: Option<&Category>,
    account: &Account,
) -> Result<(), DomainError> {
    let given = category.map(|c| c.id());
    if record_category_id != given {
        return Err(DomainError::CategoryMismatch {
            expected: record_category_id,
            actual: given,
        });
    }

    if let Some(category) = category {
        if category.account_id() != account.id() {
            return Err(DomainError::AccountMismatch {
                expected: account.id(),
                actual: category.account_id(),
            });
        }
    }

    Ok(())
}
