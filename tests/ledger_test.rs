mod common;

use anyhow::Result;
use common::test_service;
use kassa::application::{AppError, LedgerService};
use tempfile::TempDir;

#[tokio::test]
async fn test_create_account_returns_assigned_view() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let view = service.create_account("Ada", "Lovelace", 100).await?;

    assert!(view.account_number > 0);
    assert_eq!(view.first_name, "Ada");
    assert_eq!(view.last_name, "Lovelace");
    assert_eq!(view.balance, 100);

    Ok(())
}

#[tokio::test]
async fn test_account_numbers_are_unique() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let a = service.create_account("Ada", "Lovelace", 0).await?;
    let b = service.create_account("Grace", "Hopper", 0).await?;

    assert_ne!(a.account_number, b.account_number);

    Ok(())
}

#[tokio::test]
async fn test_create_allows_negative_initial_balance() -> Result<()> {
    // Account creation performs no balance validation.
    let (service, _temp) = test_service().await?;

    let view = service.create_account("Ada", "Lovelace", -50).await?;
    assert_eq!(view.balance, -50);

    let found = service.find_account(view.account_number).await?;
    assert_eq!(found.balance, -50);

    Ok(())
}

#[tokio::test]
async fn test_find_unknown_account_fails_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.find_account(9999).await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(9999)));
    assert!(!err.is_retryable());

    Ok(())
}

#[tokio::test]
async fn test_deposit_increases_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 100).await?;

    service.deposit(acct.account_number, 50).await?;

    let found = service.find_account(acct.account_number).await?;
    assert_eq!(found.balance, 150);

    Ok(())
}

#[tokio::test]
async fn test_negative_deposit_reduces_balance() -> Result<()> {
    // Deposit amounts are not sign-checked.
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 100).await?;

    service.deposit(acct.account_number, -30).await?;

    let found = service.find_account(acct.account_number).await?;
    assert_eq!(found.balance, 70);

    Ok(())
}

#[tokio::test]
async fn test_deposit_into_unknown_account_fails_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.deposit(9999, 50).await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(9999)));

    Ok(())
}

#[tokio::test]
async fn test_withdraw_reduces_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 100).await?;

    service.withdraw(acct.account_number, 60).await?;

    let found = service.find_account(acct.account_number).await?;
    assert_eq!(found.balance, 40);
    assert!(found.balance >= 0);

    Ok(())
}

#[tokio::test]
async fn test_overdraft_leaves_balance_unchanged() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 100).await?;

    let err = service.withdraw(acct.account_number, 150).await.unwrap_err();
    match err {
        AppError::Overdraft {
            account_number,
            balance,
            amount,
        } => {
            assert_eq!(account_number, acct.account_number);
            assert_eq!(balance, 100);
            assert_eq!(amount, 150);
        }
        other => panic!("expected overdraft, got: {other}"),
    }

    let found = service.find_account(acct.account_number).await?;
    assert_eq!(found.balance, 100);

    Ok(())
}

#[tokio::test]
async fn test_deposit_then_withdraw_restores_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 75).await?;

    service.deposit(acct.account_number, 40).await?;
    service.withdraw(acct.account_number, 40).await?;

    let found = service.find_account(acct.account_number).await?;
    assert_eq!(found.balance, 75);

    Ok(())
}

#[tokio::test]
async fn test_find_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let acct = service.create_account("Ada", "Lovelace", 100).await?;

    let first = service.find_account(acct.account_number).await?;
    let second = service.find_account(acct.account_number).await?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_operations_target_only_their_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let a = service.create_account("Ada", "Lovelace", 100).await?;
    let b = service.create_account("Grace", "Hopper", 200).await?;

    service.deposit(a.account_number, 50).await?;
    service.withdraw(b.account_number, 25).await?;

    assert_eq!(service.find_account(a.account_number).await?.balance, 150);
    assert_eq!(service.find_account(b.account_number).await?.balance, 175);

    Ok(())
}

/// The end-to-end cashier scenario: create with 100, bounce a withdrawal of
/// 150, deposit 50, then drain the full 150.
#[tokio::test]
async fn test_cashier_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let acct = service.create_account("Ada", "Lovelace", 100).await?;
    assert_eq!(acct.balance, 100);

    let err = service.withdraw(acct.account_number, 150).await.unwrap_err();
    assert!(matches!(err, AppError::Overdraft { .. }));
    assert_eq!(service.find_account(acct.account_number).await?.balance, 100);

    service.deposit(acct.account_number, 50).await?;
    assert_eq!(service.find_account(acct.account_number).await?.balance, 150);

    service.withdraw(acct.account_number, 150).await?;
    assert_eq!(service.find_account(acct.account_number).await?.balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_balance_survives_reconnect() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db_path = db_path.to_str().unwrap();

    let account_number = {
        let service = LedgerService::init(db_path).await?;
        let acct = service.create_account("Ada", "Lovelace", 100).await?;
        service.deposit(acct.account_number, 23).await?;
        acct.account_number
    };

    let service = LedgerService::connect(db_path).await?;
    let found = service.find_account(account_number).await?;
    assert_eq!(found.balance, 123);
    assert_eq!(found.first_name, "Ada");

    Ok(())
}
