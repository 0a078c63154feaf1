//! Core double-entry bookkeeping logic.
//!
//! This crate contains pure business logic with ZERO web or database dependencies:
//! value objects, the Account aggregate, the Transfer and Exchange domain services, and
//! the reconciliation calculations. Storage, locking, and orchestration live in
//! `ledger-db` and `ledger-app`.
//!
//! # Modules
//!
//! - `model` - Transaction/TransferDetails/ExchangeDetails/LedgerRecord descriptors
//! - `rate` - ExchangeRate value object and the fixed-rate provider
//! - `account` - The Account aggregate and its balance-protection rules
//! - `transfer` - The Transfer domain service
//! - `exchange` - The Exchange domain service
//! - `reconciliation` - Pure invariant-checking and report assembly
//! - `error` - The domain error taxonomy

pub mod account;
pub mod error;
pub mod exchange;
pub mod model;
pub mod rate;
pub mod reconciliation;
pub mod transfer;

pub use account::Account;
pub use error::CoreError;
pub use exchange::{ExchangeDescriptor, ExchangeService};
pub use model::{ExchangeDetails, LedgerRecord, Transaction, TransactionType, TransferDetails};
pub use rate::{ExchangeRate, FixedRateProvider, RateProvider};
pub use transfer::{TransferDescriptor, TransferService};
