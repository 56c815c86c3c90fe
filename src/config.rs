use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub const OVERDRAFT_LIMIT_VAR: &str = "LEDGER_OVERDRAFT_LIMIT";
pub const MAX_WITHDRAWALS_VAR: &str = "LEDGER_MAX_WITHDRAWALS";

/// Limits given to every checking account opened by a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckingPolicy {
    pub overdraft_limit: Decimal,
    pub max_withdrawals: u32,
}

impl Default for CheckingPolicy {
    fn default() -> Self {
        Self {
            overdraft_limit: Decimal::new(50000, 2),
            max_withdrawals: 3,
        }
    }
}

impl CheckingPolicy {
    /// Defaults, overridden by `LEDGER_OVERDRAFT_LIMIT` and
    /// `LEDGER_MAX_WITHDRAWALS` when they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut policy = Self::default();
        if let Some(value) = lookup(OVERDRAFT_LIMIT_VAR) {
            policy.overdraft_limit = Decimal::from_str(value.trim())
                .with_context(|| format!("invalid {OVERDRAFT_LIMIT_VAR}: {value:?}"))?;
        }
        if let Some(value) = lookup(MAX_WITHDRAWALS_VAR) {
            policy.max_withdrawals = value
                .trim()
                .parse()
                .with_context(|| format!("invalid {MAX_WITHDRAWALS_VAR}: {value:?}"))?;
        }
        Ok(policy)
    }
}
