use thiserror::Error;

use crate::account::AccountNumber;

/// Reasons a transaction is refused. None of them mutate the account.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransactionError {
    #[error("The amount informed is invalid.")]
    InvalidAmount,
    #[error("Insufficient balance.")]
    InsufficientFunds,
    #[error("The withdrawal amount exceeds the limit.")]
    LimitExceeded,
    #[error("Maximum number of withdrawals exceeded.")]
    WithdrawalCountExceeded,
    #[error("The deposit would exceed the maximum balance.")]
    BalanceOverflow,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Client {0} not found.")]
    ClientNotFound(String),
    #[error("Client already registered with national id {0}.")]
    DuplicateClient(String),
    #[error("Account {0} not found.")]
    AccountNotFound(AccountNumber),
    #[error("Client {0} has no accounts.")]
    NoAccounts(String),
    #[error("Client {0} has several accounts, one must be selected.")]
    AmbiguousAccount(String),
    #[error("No more account numbers are available.")]
    AccountNumbersExhausted,
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
