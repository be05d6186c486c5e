//! Account service: accounts are created once per user, with the user's id
//! as the account id, and carry the basis sum entries are applied on top of.

use shared::CreateAccountRequest;
use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use crate::domain::models::{Account, Money};
use crate::domain::ServiceError;
use crate::storage::mappers::AccountMapper;
use crate::storage::repositories::AccountRepository;
use crate::storage::TransactionalExecutor;

#[derive(Clone)]
pub struct AccountService {
    executor: TransactionalExecutor,
}

impl AccountService {
    pub fn new(executor: TransactionalExecutor) -> Self {
        Self { executor }
    }

    /// Create the account of `account_id`. Fails if it already exists.
    pub async fn create_account(
        &self,
        account_id: Uuid,
        request: CreateAccountRequest,
    ) -> Result<shared::Account, ServiceError> {
        info!("Creating account {}: {:?}", account_id, request);
        let basis_sum = request.basis_sum;

        let account = self
            .executor
            .execute_and_commit(move |conn| {
                Box::pin(async move {
                    if AccountRepository::exists(&mut *conn, account_id).await? {
                        return Err(ServiceError::AlreadyExists(format!("Account {}", account_id)));
                    }

                    let account = Account::create(account_id, Money::new(basis_sum));
                    let record = AccountMapper::to_dto(&account);
                    AccountRepository::insert(&mut *conn, &record).await?;

                    Ok(record)
                })
            })
            .await?;

        info!("Successfully created account {}", account.id);
        Ok(account)
    }

    pub async fn get_account(&self, account_id: Uuid) -> Result<shared::Account, ServiceError> {
        self.executor
            .execute_readonly(move |conn| {
                Box::pin(async move {
                    let account = load_account(conn, account_id).await?;
                    Ok(AccountMapper::to_dto(&account))
                })
            })
            .await
    }
}

/// Load an account as a domain object, or `NotFound`
pub(crate) async fn load_account(conn: &mut SqliteConnection, account_id: Uuid) -> Result<Account, ServiceError> {
    let record = AccountRepository::get(conn, account_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Account {}", account_id)))?;

    Ok(AccountMapper::to_domain(&record))
}
