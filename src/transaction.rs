use std::fmt;

use chrono::{DateTime, Local};
use log::{debug, trace};
use rust_decimal::Decimal;

use crate::account::Account;
use crate::error::TransactionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdrawal => f.write_str("Withdrawal"),
        }
    }
}

/// A single monetary movement. Built fresh for every requested operation and
/// recorded in the account history only when it is applied successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
    timestamp: DateTime<Local>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Self::at(kind, amount, Local::now())
    }

    pub fn at(kind: TransactionKind, amount: Decimal, timestamp: DateTime<Local>) -> Self {
        Self {
            kind,
            amount,
            timestamp,
        }
    }

    pub fn deposit(amount: Decimal) -> Self {
        Self::new(TransactionKind::Deposit, amount)
    }

    pub fn withdrawal(amount: Decimal) -> Self {
        Self::new(TransactionKind::Withdrawal, amount)
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Validates the transaction against the account and, only if every rule
    /// passes, mutates the balance and appends the transaction to the history.
    pub fn apply(self, account: &mut Account) -> Result<(), TransactionError> {
        let checked = match self.kind {
            TransactionKind::Deposit => self.check_deposit(account),
            TransactionKind::Withdrawal => self.check_withdrawal(account),
        };
        if let Err(err) = checked {
            debug!(
                "Rejected {} of {} on account {}: {err}",
                self.kind,
                self.amount,
                account.number()
            );
            return Err(err);
        }

        match self.kind {
            TransactionKind::Deposit => account.credit(self.amount),
            TransactionKind::Withdrawal => {
                if let Some(limits) = account.limits_mut() {
                    limits.withdrawals_used += 1;
                }
                account.debit(self.amount);
            }
        }
        trace!(
            "Applied {} of {} on account {}, balance now {}",
            self.kind,
            self.amount,
            account.number(),
            account.balance()
        );
        account.history_mut().append(self);

        Ok(())
    }

    fn check_deposit(&self, account: &Account) -> Result<(), TransactionError> {
        if self.amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount);
        }
        if account.balance().checked_add(self.amount).is_none() {
            return Err(TransactionError::BalanceOverflow);
        }
        Ok(())
    }

    // First failing rule wins. Balance sufficiency applies to every account,
    // the per-withdrawal cap and the withdrawal count only to limited ones.
    fn check_withdrawal(&self, account: &Account) -> Result<(), TransactionError> {
        if self.amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount);
        }
        if self.amount > account.balance() {
            return Err(TransactionError::InsufficientFunds);
        }
        if let Some(limits) = account.limits() {
            if self.amount > limits.overdraft_limit {
                return Err(TransactionError::LimitExceeded);
            }
            if limits.withdrawals_used >= limits.max_withdrawals {
                return Err(TransactionError::WithdrawalCountExceeded);
            }
        }
        Ok(())
    }
}
