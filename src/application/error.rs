use thiserror::Error;

use crate::domain::{AccountNumber, Units};
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("Overdraft attempt on account {account_number}: balance {balance}, amount {amount}")]
    Overdraft {
        account_number: AccountNumber,
        balance: Units,
        amount: Units,
    },

    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl AppError {
    /// Retryable errors leave no partial mutation behind; the caller may
    /// simply issue the same operation again. `AccountNotFound` and
    /// `Overdraft` need different input, not a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(e) if e.is_retryable())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(account_number) => AppError::AccountNotFound(account_number),
            other => AppError::Storage(other),
        }
    }
}
