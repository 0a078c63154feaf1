//! Shared value types, configuration, and error plumbing for the ledger core.
//!
//! This crate provides common building blocks used by every other crate:
//! - Money and Currency value types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Core configuration loading

pub mod config;
pub mod types;

pub use config::CoreConfig;
pub use types::{
    AccountId, Currency, ExchangeDetailsId, LedgerRecordId, Money, MoneyError, TransactionId,
    TransferDetailsId, UserId,
};
