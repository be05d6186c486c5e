use sqlx::error::{DatabaseError, ErrorKind};

use crate::domain::DomainError;

/// SQLSTATE codes that mean "another transaction got there first"
const POSTGRES_CONFLICT_CODES: [&str; 4] = ["40001", "40P01", "40000", "23505"];

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Errors raised while talking to the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A concurrent transaction won a race. Safe to retry from scratch.
    #[error("Conflicting concurrent transaction: {0}")]
    Conflict(#[source] sqlx::Error),
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("Corrupt {table} row {id}: {reason}")]
    CorruptRow {
        table: &'static str,
        id: String,
        reason: String,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Transaction still conflicting after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl StoreError {
    pub fn corrupt(table: &'static str, id: impl ToString, reason: impl ToString) -> Self {
        StoreError::CorruptRow {
            table,
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let conflict = match &err {
            sqlx::Error::Database(db) => is_conflicting(db.as_ref()),
            _ => false,
        };

        if conflict {
            StoreError::Conflict(err)
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_conflicting(err: &dyn DatabaseError) -> bool {
    matches!(err.kind(), ErrorKind::UniqueViolation)
        || err.code().map_or(false, |code| is_conflict_code(&code))
}

/// Whether a driver error code marks a serialization failure, deadlock,
/// lock contention or duplicate key.
///
/// Five character codes are Postgres SQLSTATEs; anything numeric is a
/// SQLite (extended) result code.
pub fn is_conflict_code(code: &str) -> bool {
    if POSTGRES_CONFLICT_CODES.contains(&code) {
        return true;
    }

    match code.parse::<i32>() {
        Ok(SQLITE_CONSTRAINT_PRIMARYKEY) | Ok(SQLITE_CONSTRAINT_UNIQUE) => true,
        Ok(extended) if code.len() < 5 => matches!(extended & 0xff, SQLITE_BUSY | SQLITE_LOCKED),
        _ => false,
    }
}

/// Errors that can tell whether they were caused by a conflicting
/// concurrent transaction.
pub trait ConflictAware {
    fn is_conflict(&self) -> bool;
}

impl ConflictAware for StoreError {
    fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
