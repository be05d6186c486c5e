//! Domain model for accounts, ledger entries and recurring money flows.

pub mod account;
pub mod account_entry;
pub mod category;
pub mod money;
pub mod money_flow;
pub mod period;
pub mod schedule;
pub mod transaction;

pub use account::Account;
pub use account_entry::AccountEntry;
pub use category::{Category, MAX_CATEGORY_NAME_LENGTH};
pub use money::Money;
pub use money_flow::MoneyFlow;
pub use period::Period;
pub use schedule::PeriodicalSchedule;
pub use transaction::Transaction;
