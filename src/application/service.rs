use tracing::{debug, info};

use crate::domain::{AccountNumber, AccountView, Units};
use crate::storage::AccountStore;

use super::AppError;

/// Application service providing the ledger operations: create, find,
/// deposit, withdraw. This is the primary interface for any client (CLI,
/// API, TUI, etc.) and the only place business rules are enforced.
///
/// The service never caches accounts across calls: every operation
/// re-fetches current state from the store, applies its mutation, and
/// relies on the store's commit for durability before returning.
pub struct LedgerService {
    store: AccountStore,
}

impl LedgerService {
    /// Create a new ledger service with the given account store.
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = AccountStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = AccountStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Open an account for the named holder.
    ///
    /// The initial balance is deliberately not validated; a negative
    /// opening balance is accepted.
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        initial_balance: Units,
    ) -> Result<AccountView, AppError> {
        let account = self
            .store
            .create(first_name, last_name, initial_balance)
            .await?;

        info!(
            account_number = account.account_number,
            balance = account.balance,
            "account created"
        );
        Ok(account.view())
    }

    /// Look up an account by number.
    pub async fn find_account(
        &self,
        account_number: AccountNumber,
    ) -> Result<AccountView, AppError> {
        let account = self.store.find(account_number).await?;
        Ok(account.view())
    }

    /// Deposit `amount` into the account. The amount is not sign-checked;
    /// a negative deposit silently reduces the balance.
    pub async fn deposit(
        &self,
        account_number: AccountNumber,
        amount: Units,
    ) -> Result<(), AppError> {
        let _guard = self.store.lock(account_number).await;

        let mut account = self.store.find(account_number).await?;
        account.deposit(amount);
        self.store.commit(&account).await?;

        debug!(account_number, amount, balance = account.balance, "deposit");
        Ok(())
    }

    /// Withdraw `amount` from the account. Fails with `Overdraft` when the
    /// amount exceeds the current balance, in which case the stored record
    /// is left completely unmodified.
    pub async fn withdraw(
        &self,
        account_number: AccountNumber,
        amount: Units,
    ) -> Result<(), AppError> {
        let _guard = self.store.lock(account_number).await;

        let mut account = self.store.find(account_number).await?;
        account
            .withdraw(amount)
            .map_err(|e| AppError::Overdraft {
                account_number,
                balance: e.balance,
                amount: e.amount,
            })?;
        self.store.commit(&account).await?;

        debug!(
            account_number,
            amount,
            balance = account.balance,
            "withdrawal"
        );
        Ok(())
    }
}
