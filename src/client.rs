use std::borrow::Borrow;
use std::fmt;

use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;

use crate::account::{Account, AccountNumber};
use crate::error::TransactionError;
use crate::transaction::Transaction;

/// National id (CPF) of a client, the natural key of the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NationalId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NationalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NationalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
    name: String,
    birth_date: NaiveDate,
    national_id: NationalId,
    address: String,
    accounts: Vec<AccountNumber>,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        national_id: NationalId,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_date,
            national_id,
            address: address.into(),
            accounts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn national_id(&self) -> &NationalId {
        &self.national_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Numbers of the client's accounts, in opening order.
    pub fn accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn owns(&self, number: AccountNumber) -> bool {
        self.accounts.contains(&number)
    }

    pub fn add_account(&mut self, number: AccountNumber) {
        self.accounts.push(number);
    }

    /// Single entry point for moving money on one of the client's accounts.
    pub fn perform_transaction(
        &self,
        account: &mut Account,
        transaction: Transaction,
    ) -> Result<(), TransactionError> {
        debug!(
            "Client {} requested {} of {} on account {}",
            self.national_id,
            transaction.kind(),
            transaction.amount(),
            account.number()
        );
        transaction.apply(account)
    }
}
