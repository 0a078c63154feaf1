//! Storage adapters for users, accounts, transfers, exchanges, transaction history, and the
//! ledger (§4.7).

pub mod accounts;
pub mod exchanges;
pub mod ledger;
pub mod transactions;
pub mod transfers;
pub mod users;

pub use accounts::AccountRepository;
pub use exchanges::ExchangeRepository;
pub use ledger::LedgerRepository;
pub use transactions::{TransactionFilter, TransactionRecord, TransactionRepository};
pub use transfers::TransferRepository;
pub use users::UserRepository;
