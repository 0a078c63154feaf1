//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger schema
//! - Repository abstractions for data access (§4.7)
//! - The context-propagated unit of work (§4.6)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod unit_of_work;

pub use repositories::{
    AccountRepository, ExchangeRepository, LedgerRepository, TransactionFilter, TransactionRecord,
    TransactionRepository, TransferRepository, UserRepository,
};
pub use unit_of_work::{Handle, HandleConnection, UnitOfWork};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
