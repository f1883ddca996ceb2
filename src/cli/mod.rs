use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{AccountNumber, AccountView, parse_units};

/// Kassa - Minimal Bank Account Ledger
#[derive(Parser)]
#[command(name = "kassa")]
#[command(about = "A minimal bank-account ledger backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "kassa.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Open a new account
    Create {
        /// Holder's first name
        first_name: String,

        /// Holder's last name
        last_name: String,

        /// Initial balance in whole units (negative values are accepted)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },

    /// Show an account
    Show {
        /// Account number
        account: AccountNumber,

        /// Print the account as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deposit into an account
    Deposit {
        /// Account number
        account: AccountNumber,

        /// Amount in whole units
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Withdraw from an account
    Withdraw {
        /// Account number
        account: AccountNumber,

        /// Amount in whole units
        amount: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Create {
                first_name,
                last_name,
                balance,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let balance = parse_units(&balance)
                    .context("Invalid balance format. Use a whole number like '100'")?;

                let view = service
                    .create_account(&first_name, &last_name, balance)
                    .await?;

                println!(
                    "Created account {} for {} {} (balance: {})",
                    view.account_number, view.first_name, view.last_name, view.balance
                );
            }

            Commands::Show { account, json } => {
                let service = LedgerService::connect(&self.database).await?;
                let view = service.find_account(account).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                } else {
                    print_account(&view);
                }
            }

            Commands::Deposit { account, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount = parse_units(&amount)
                    .context("Invalid amount format. Use a whole number like '50'")?;

                service.deposit(account, amount).await?;
                let view = service.find_account(account).await?;

                println!(
                    "Deposited {} into account {} (balance: {})",
                    amount, account, view.balance
                );
            }

            Commands::Withdraw { account, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount = parse_units(&amount)
                    .context("Invalid amount format. Use a whole number like '50'")?;

                service.withdraw(account, amount).await?;
                let view = service.find_account(account).await?;

                println!(
                    "Withdrew {} from account {} (balance: {})",
                    amount, account, view.balance
                );
            }
        }

        Ok(())
    }
}

fn print_account(view: &AccountView) {
    println!("{:<10} {}", "ACCOUNT", view.account_number);
    println!("{:<10} {} {}", "HOLDER", view.first_name, view.last_name);
    println!("{:<10} {}", "BALANCE", view.balance);
}
