use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::account::AccountNumber;
use crate::client::NationalId;
use crate::error::LedgerError;
use crate::registry::Registry;
use crate::transaction::{Transaction, TransactionKind};

const SEPARATOR_WIDTH: usize = 100;

/// One operation requested by a front end, with its inputs already parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RegisterClient {
        name: String,
        birth_date: NaiveDate,
        national_id: NationalId,
        address: String,
    },
    OpenAccount {
        national_id: NationalId,
    },
    Transact {
        kind: TransactionKind,
        national_id: NationalId,
        account: Option<AccountNumber>,
        amount: Decimal,
    },
    Statement {
        national_id: NationalId,
        account: Option<AccountNumber>,
    },
    ListAccounts,
    ListClients,
}

/// Text to show the user after a successful command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome(pub String);

/// Runs a command against the registry. A failed command leaves the registry
/// untouched.
pub fn execute(registry: &mut Registry, command: Command) -> Result<Outcome, LedgerError> {
    match command {
        Command::RegisterClient {
            name,
            birth_date,
            national_id,
            address,
        } => {
            registry.register_client(name, birth_date, national_id, address)?;
            Ok(Outcome("=== Client registered successfully! ===".to_owned()))
        }
        Command::OpenAccount { national_id } => {
            let number = registry.open_account(national_id.as_str())?;
            Ok(Outcome(format!("=== Account {number} opened successfully! ===")))
        }
        Command::Transact {
            kind,
            national_id,
            account,
            amount,
        } => {
            let number = select_account(registry, &national_id, account)?;
            registry.perform_transaction(
                national_id.as_str(),
                number,
                Transaction::new(kind, amount),
            )?;
            Ok(Outcome(format!("=== {kind} completed successfully! ===")))
        }
        Command::Statement {
            national_id,
            account,
        } => {
            let number = select_account(registry, &national_id, account)?;
            registry.statement(national_id.as_str(), number).map(Outcome)
        }
        Command::ListAccounts => Ok(Outcome(list_accounts(registry))),
        Command::ListClients => Ok(Outcome(list_clients(registry))),
    }
}

/// Picks the account a command targets. Without an explicit number the client
/// must own exactly one account.
pub fn select_account(
    registry: &Registry,
    national_id: &NationalId,
    account: Option<AccountNumber>,
) -> Result<AccountNumber, LedgerError> {
    let client = registry
        .find_client_by_national_id(national_id.as_str())
        .ok_or_else(|| LedgerError::ClientNotFound(national_id.to_string()))?;

    match (account, client.accounts()) {
        (Some(number), _) if client.owns(number) => Ok(number),
        (Some(number), _) => Err(LedgerError::AccountNotFound(number)),
        (None, []) => Err(LedgerError::NoAccounts(national_id.to_string())),
        (None, [number]) => Ok(*number),
        (None, _) => Err(LedgerError::AmbiguousAccount(national_id.to_string())),
    }
}

fn list_accounts(registry: &Registry) -> String {
    let mut listing = String::new();
    for account in registry.accounts() {
        let holder = registry
            .owner_of(account)
            .map(|client| client.name())
            .unwrap_or_default();
        let _ = writeln!(listing, "{}", "=".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(listing, "Branch:\t\t{}", account.branch());
        let _ = writeln!(listing, "Account:\t{}", account.number());
        let _ = writeln!(listing, "Holder:\t\t{holder}");
    }
    if listing.is_empty() {
        return "@@@ No accounts registered. @@@".to_owned();
    }
    listing
}

fn list_clients(registry: &Registry) -> String {
    let mut listing = String::from("--- Registered clients ---\n");
    if registry.clients().next().is_none() {
        listing.push_str("@@@ No clients registered. @@@");
        return listing;
    }
    for (index, client) in registry.clients().enumerate() {
        let _ = writeln!(listing, "{}", "=".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(listing, "Client #{}", index + 1);
        let _ = writeln!(listing, "Name:\t\t{}", client.name());
        let _ = writeln!(listing, "National id:\t{}", client.national_id());
        let _ = writeln!(listing, "Birth date:\t{}", client.birth_date().format("%d/%m/%Y"));
        let _ = writeln!(listing, "Address:\t{}", client.address());
    }
    listing.push_str(&"=".repeat(SEPARATOR_WIDTH));
    listing
}
