//! # Transactional Executor
//!
//! Runs a unit of work inside a single database transaction and re-runs it
//! from scratch when the store reports a conflicting concurrent transaction.
//!
//! A unit of work is a closure handed a `&mut SqliteConnection` that belongs
//! to the current attempt's transaction. It may be invoked several times, so
//! it must not carry effects across attempts other than through the store.
//! Every read and write it makes lands in the same transaction, which SQLite
//! runs with serializable isolation.

use futures::future::BoxFuture;
use sqlx::SqliteConnection;
use tracing::{debug, error, warn};

use super::{ConflictAware, DbConnection, StoreError};

/// Attempts made before a conflicting unit of work is given up on
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide what to do with the error of attempt number `attempt`
    /// (1-based).
    ///
    /// `Ok(())` means run the unit of work again. Non-conflict errors are
    /// handed back unchanged; a conflict on the last permitted attempt turns
    /// into [`StoreError::RetriesExhausted`].
    pub fn check<E>(&self, attempt: u32, err: E) -> Result<(), E>
    where
        E: From<StoreError> + ConflictAware,
    {
        if !err.is_conflict() {
            return Err(err);
        }

        if attempt >= self.max_attempts {
            return Err(E::from(StoreError::RetriesExhausted {
                attempts: self.max_attempts,
            }));
        }

        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Commit,
    Rollback,
}

#[derive(Clone)]
pub struct TransactionalExecutor {
    db: DbConnection,
    retry: RetryPolicy,
}

impl TransactionalExecutor {
    pub fn new(db: DbConnection, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }

    pub fn db(&self) -> &DbConnection {
        &self.db
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Run `work` in a transaction and commit it.
    ///
    /// When an attempt fails, its transaction is rolled back before the next
    /// attempt opens a fresh one, so partial effects never leak.
    pub async fn execute_and_commit<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnMut(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        E: From<StoreError> + ConflictAware + Send,
        T: Send,
    {
        self.execute(work, Completion::Commit).await
    }

    /// Run `work` in a transaction that is always rolled back
    pub async fn execute_readonly<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnMut(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        E: From<StoreError> + ConflictAware + Send,
        T: Send,
    {
        self.execute(work, Completion::Rollback).await
    }

    async fn execute<T, E, F>(&self, mut work: F, completion: Completion) -> Result<T, E>
    where
        F: for<'c> FnMut(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        E: From<StoreError> + ConflictAware + Send,
        T: Send,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.attempt(&mut work, completion).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let conflict = err.is_conflict();
            if let Err(err) = self.retry.check(attempt, err) {
                if conflict {
                    error!(
                        "Transaction still conflicting after {} attempts, giving up",
                        attempt
                    );
                }
                return Err(err);
            }

            warn!(
                "Conflicting transaction on attempt {}/{}, retrying",
                attempt,
                self.retry.max_attempts()
            );
        }
    }

    async fn attempt<T, E, F>(&self, work: &mut F, completion: Completion) -> Result<T, E>
    where
        F: for<'c> FnMut(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        E: From<StoreError> + ConflictAware + Send,
        T: Send,
    {
        let mut tx = self.db.pool().begin().await.map_err(store_error::<E>)?;

        // an early return drops `tx`, which rolls it back
        let value = work(&mut *tx).await?;

        match completion {
            Completion::Commit => tx.commit().await.map_err(store_error::<E>)?,
            Completion::Rollback => {
                debug!("Rolling back read-only transaction");
                tx.rollback().await.map_err(store_error::<E>)?
            }
        }

        Ok(value)
    }
}

fn store_error<E: From<StoreError>>(err: sqlx::Error) -> E {
    E::from(StoreError::from(err))
}
