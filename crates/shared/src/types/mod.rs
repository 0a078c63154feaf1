//! Common value types shared across the ledger crates.

pub mod id;
pub mod money;

pub use id::{AccountId, ExchangeDetailsId, LedgerRecordId, TransactionId, TransferDetailsId, UserId};
pub use money::{Currency, Money, MoneyError};
