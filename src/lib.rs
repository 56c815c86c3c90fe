//! In-memory banking ledger: clients, checking accounts and the deposits and
//! withdrawals applied to them.

pub mod account;
pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod registry;
pub mod transaction;
