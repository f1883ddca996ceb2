use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{Account, AccountNumber, Units};

use super::MIGRATION_001_INITIAL;

/// Failures surfaced by the account store.
///
/// `Timeout` and `Io` are retryable from the caller's point of view; no
/// partial mutation is ever visible behind either. `NotFound` is not.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no account with number {0}")]
    NotFound(AccountNumber),

    #[error("storage timed out")]
    Timeout(#[source] sqlx::Error),

    #[error("storage I/O failed")]
    Io(#[source] sqlx::Error),

    #[error("corrupt account record: {0}")]
    Corrupt(String),
}

impl StoreError {
    fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout(err),
            other => StoreError::Io(other),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout(_) | StoreError::Io(_))
    }
}

/// Durable keyed storage of account records over SQLite.
///
/// Every mutation is a single statement, i.e. one implicit SQLite
/// transaction: it lands whole or not at all. On top of that the store
/// keeps a per-account-number lock registry so that one read-modify-write
/// cycle at a time runs against any given account.
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
    locks: Arc<Mutex<HashMap<AccountNumber, Arc<Mutex<()>>>>>,
}

impl AccountStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self, StoreError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Store a new account record and return it with its assigned number.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        balance: Units,
    ) -> Result<Account, StoreError> {
        let created_at = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO accounts (first_name, last_name, balance, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING account_number
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(balance)
        .bind(created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(Account {
            account_number: row.get("account_number"),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            balance,
            created_at,
        })
    }

    /// Fetch an account by number. Pure read, no side effects.
    pub async fn find(&self, account_number: AccountNumber) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT account_number, first_name, last_name, balance, created_at
            FROM accounts
            WHERE account_number = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        match row {
            Some(row) => Self::row_to_account(&row),
            None => Err(StoreError::NotFound(account_number)),
        }
    }

    /// Persist a fully mutated account. Holder fields are written back
    /// wholesale together with the balance.
    pub async fn commit(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = ?, last_name = ?, balance = ?
            WHERE account_number = ?
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.balance)
        .bind(account.account_number)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        if result.rows_affected() == 0 {
            // The record vanished between fetch and commit. Nothing was
            // written, so no partial mutation is visible.
            return Err(StoreError::NotFound(account.account_number));
        }

        Ok(())
    }

    /// Acquire the single-writer guard for one account number. Guards for
    /// different accounts never contend; holding the guard across a
    /// fetch-mutate-commit cycle makes the update linearizable per account.
    pub async fn lock(&self, account_number: AccountNumber) -> OwnedMutexGuard<()> {
        let cell = {
            let mut locks = self.locks.lock().await;
            locks.entry(account_number).or_default().clone()
        };
        cell.lock_owned().await
    }

    fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            account_number: row.get("account_number"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            balance: row.get("balance"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|e| StoreError::Corrupt(format!("invalid created_at: {e}")))?
                .with_timezone(&Utc),
        })
    }
}
