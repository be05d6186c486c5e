use crate::domain::models::{Account, Money};

pub struct AccountMapper;

impl AccountMapper {
    pub fn to_domain(record: &shared::Account) -> Account {
        Account::create(record.id, Money::new(record.basis_sum))
    }

    pub fn to_dto(account: &Account) -> shared::Account {
        shared::Account {
            id: account.id(),
            basis_sum: account.basis_sum().amount(),
        }
    }
}
