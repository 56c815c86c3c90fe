use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::client::NationalId;
use crate::config::CheckingPolicy;
use crate::history::History;

pub const BRANCH_CODE: &str = "0001";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(u32);

impl AccountNumber {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Number given to the account opened after `opened` others.
    pub fn following(opened: usize) -> Option<Self> {
        opened
            .checked_add(1)
            .and_then(|next| u32::try_from(next).ok())
            .map(Self)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extra withdrawal gates carried by checking accounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalLimits {
    /// Largest amount a single withdrawal may take.
    pub overdraft_limit: Decimal,
    pub max_withdrawals: u32,
    pub withdrawals_used: u32,
}

impl From<&CheckingPolicy> for WithdrawalLimits {
    fn from(policy: &CheckingPolicy) -> Self {
        Self {
            overdraft_limit: policy.overdraft_limit,
            max_withdrawals: policy.max_withdrawals,
            withdrawals_used: 0,
        }
    }
}

/// Client's account. The balance only moves through [`Transaction::apply`].
///
/// [`Transaction::apply`]: crate::transaction::Transaction::apply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    number: AccountNumber,
    branch: &'static str,
    balance: Decimal,
    owner: NationalId,
    limits: Option<WithdrawalLimits>,
    history: History,
}

impl Account {
    /// Opens a checking account with zero balance and the policy's limits.
    pub fn checking(number: AccountNumber, owner: NationalId, policy: &CheckingPolicy) -> Self {
        Self {
            limits: Some(WithdrawalLimits::from(policy)),
            ..Self::unlimited(number, owner)
        }
    }

    pub(crate) fn unlimited(number: AccountNumber, owner: NationalId) -> Self {
        Self {
            number,
            branch: BRANCH_CODE,
            balance: Decimal::ZERO,
            owner,
            limits: None,
            history: History::new(),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn branch(&self) -> &'static str {
        self.branch
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn owner(&self) -> &NationalId {
        &self.owner
    }

    pub fn limits(&self) -> Option<&WithdrawalLimits> {
        self.limits.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn statement(&self) -> String {
        self.history.render(self.balance)
    }

    pub(crate) fn limits_mut(&mut self) -> Option<&mut WithdrawalLimits> {
        self.limits.as_mut()
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub(crate) fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Transaction, TransactionKind};
    use chrono::{Local, TimeZone};
    use std::str::FromStr;

    fn decimal(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_following_account_number() {
        assert_eq!(Some(AccountNumber::new(1)), AccountNumber::following(0));
        assert_eq!(Some(AccountNumber::new(8)), AccountNumber::following(7));
        assert_eq!(
            Some(AccountNumber::new(u32::MAX)),
            AccountNumber::following(u32::MAX as usize - 1)
        );
        assert_eq!(None, AccountNumber::following(u32::MAX as usize));
        assert_eq!(None, AccountNumber::following(usize::MAX));
    }

    #[test]
    fn test_new_checking_account() {
        let account = Account::checking(
            AccountNumber::new(7),
            NationalId::from("111"),
            &CheckingPolicy::default(),
        );

        assert_eq!(AccountNumber::new(7), account.number());
        assert_eq!("0001", account.branch());
        assert_eq!(Decimal::ZERO, account.balance());
        assert_eq!("111", account.owner().as_str());
        assert!(account.history().is_empty());

        let limits = account.limits().unwrap();
        assert_eq!(decimal("500"), limits.overdraft_limit);
        assert_eq!(3, limits.max_withdrawals);
        assert_eq!(0, limits.withdrawals_used);
    }

    #[test]
    fn test_limits_follow_policy() {
        let policy = CheckingPolicy {
            overdraft_limit: decimal("50"),
            max_withdrawals: 1,
        };
        let mut account = Account::checking(AccountNumber::new(1), NationalId::from("9"), &policy);
        Transaction::deposit(decimal("100")).apply(&mut account).unwrap();
        Transaction::withdrawal(decimal("50")).apply(&mut account).unwrap();

        assert_eq!(1, account.limits().unwrap().withdrawals_used);
        assert!(Transaction::withdrawal(decimal("1")).apply(&mut account).is_err());
    }

    #[test]
    fn test_statement_lists_applied_movements() {
        let mut account = Account::checking(
            AccountNumber::new(1),
            NationalId::from("111"),
            &CheckingPolicy::default(),
        );
        let timestamp = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let amounts = ["10", "20", "5"];
        let kinds = [
            TransactionKind::Deposit,
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
        ];
        for (kind, amount) in kinds.into_iter().zip(amounts) {
            Transaction::at(kind, decimal(amount), timestamp)
                .apply(&mut account)
                .unwrap();
        }
        // Rejected movements never show up.
        let _ = Transaction::at(TransactionKind::Withdrawal, decimal("1000"), timestamp)
            .apply(&mut account);

        let statement = account.statement();
        let first = statement.find("Deposit:\t$ 10.00").unwrap();
        let second = statement.find("Deposit:\t$ 20.00").unwrap();
        let third = statement.find("Withdrawal:\t$ 5.00").unwrap();
        assert!(first < second && second < third);
        assert!(!statement.contains("1000.00"));
        assert!(statement.contains("Balance:\t\t$ 25.00"));
        assert_eq!(statement, account.statement());
    }

    #[test]
    fn test_empty_statement() {
        let account = Account::unlimited(AccountNumber::new(1), NationalId::from("111"));

        assert!(account.statement().contains("No movements recorded."));
    }
}
