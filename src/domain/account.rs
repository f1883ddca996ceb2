use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Units;

/// Server-assigned surrogate key. Carries no business meaning.
pub type AccountNumber = i64;

/// A withdrawal that would have driven the balance negative.
#[derive(Debug, Error)]
#[error("overdraft attempt, balance: {balance}, amount: {amount}")]
pub struct OverdraftError {
    pub balance: Units,
    pub amount: Units,
}

/// A bank account as held by the store. The store owns the canonical copy;
/// instances handed out by `find` are snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_number: AccountNumber,
    pub first_name: String,
    pub last_name: String,
    pub balance: Units,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Add `amount` to the balance. The sign is deliberately not checked:
    /// a negative deposit reduces the balance.
    pub fn deposit(&mut self, amount: Units) {
        self.balance += amount;
    }

    /// Subtract `amount` from the balance, refusing any withdrawal that
    /// would leave it negative. On error the account is left untouched.
    pub fn withdraw(&mut self, amount: Units) -> Result<(), OverdraftError> {
        if amount > self.balance {
            return Err(OverdraftError {
                balance: self.balance,
                amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            account_number: self.account_number,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            balance: self.balance,
        }
    }
}

// Identity is the account number alone; two snapshots with the same number
// are the same account regardless of balance or holder fields.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.account_number == other.account_number
    }
}

impl Eq for Account {}

impl std::hash::Hash for Account {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.account_number.hash(state);
    }
}

/// Immutable read projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub account_number: AccountNumber,
    pub first_name: String,
    pub last_name: String,
    pub balance: Units,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        account.view()
    }
}
