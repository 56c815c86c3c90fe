use chrono::NaiveDate;
use indexmap::IndexMap;
use log::info;

use crate::account::{Account, AccountNumber};
use crate::client::{Client, NationalId};
use crate::config::CheckingPolicy;
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Every client and account known to the ledger, in registration order.
///
/// Clients refer to their accounts by number and accounts name their owner by
/// national id, so both sides are resolved through this registry.
#[derive(Debug, Default)]
pub struct Registry {
    policy: CheckingPolicy,
    clients: IndexMap<NationalId, Client>,
    accounts: IndexMap<AccountNumber, Account>,
}

impl Registry {
    pub fn new(policy: CheckingPolicy) -> Self {
        Self {
            policy,
            clients: IndexMap::new(),
            accounts: IndexMap::new(),
        }
    }

    pub fn policy(&self) -> &CheckingPolicy {
        &self.policy
    }

    pub fn register_client(
        &mut self,
        name: impl Into<String>,
        birth_date: NaiveDate,
        national_id: NationalId,
        address: impl Into<String>,
    ) -> Result<&Client, LedgerError> {
        if self.clients.contains_key(&national_id) {
            return Err(LedgerError::DuplicateClient(national_id.to_string()));
        }

        info!("Registering client {national_id}");
        let client = Client::new(name, birth_date, national_id.clone(), address);
        Ok(self.clients.entry(national_id).or_insert(client))
    }

    pub fn find_client_by_national_id(&self, national_id: &str) -> Option<&Client> {
        self.clients.get(national_id)
    }

    fn client(&self, national_id: &str) -> Result<&Client, LedgerError> {
        self.find_client_by_national_id(national_id)
            .ok_or_else(|| LedgerError::ClientNotFound(national_id.to_owned()))
    }

    /// Opens a new checking account for the client. Numbers are sequential,
    /// starting at 1.
    pub fn open_account(&mut self, national_id: &str) -> Result<AccountNumber, LedgerError> {
        let client = self
            .clients
            .get_mut(national_id)
            .ok_or_else(|| LedgerError::ClientNotFound(national_id.to_owned()))?;

        let number = AccountNumber::following(self.accounts.len())
            .ok_or(LedgerError::AccountNumbersExhausted)?;
        let account = Account::checking(number, client.national_id().clone(), &self.policy);
        client.add_account(number);
        self.accounts.insert(number, account);

        info!("Opened account {number} for client {national_id}");
        Ok(number)
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.get(&number)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> + '_ {
        self.clients.values()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    /// The client's accounts, in opening order.
    pub fn accounts_of(&self, national_id: &str) -> Result<Vec<&Account>, LedgerError> {
        let client = self.client(national_id)?;
        Ok(client
            .accounts()
            .iter()
            .filter_map(|number| self.accounts.get(number))
            .collect())
    }

    pub fn owner_of(&self, account: &Account) -> Option<&Client> {
        self.clients.get(account.owner())
    }

    /// Resolves the client's account and hands the transaction to the client.
    /// Fails without side effects when either side is unknown or the account
    /// belongs to someone else.
    pub fn perform_transaction(
        &mut self,
        national_id: &str,
        number: AccountNumber,
        transaction: Transaction,
    ) -> Result<(), LedgerError> {
        let client = self
            .clients
            .get(national_id)
            .ok_or_else(|| LedgerError::ClientNotFound(national_id.to_owned()))?;
        if !client.owns(number) {
            return Err(LedgerError::AccountNotFound(number));
        }
        let account = self
            .accounts
            .get_mut(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;

        client.perform_transaction(account, transaction)?;
        Ok(())
    }

    pub fn statement(
        &self,
        national_id: &str,
        number: AccountNumber,
    ) -> Result<String, LedgerError> {
        let client = self.client(national_id)?;
        if !client.owns(number) {
            return Err(LedgerError::AccountNotFound(number));
        }
        self.account(number)
            .map(Account::statement)
            .ok_or(LedgerError::AccountNotFound(number))
    }
}
