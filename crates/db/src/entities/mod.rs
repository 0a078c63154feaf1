//! `SeaORM` entity definitions for the ledger schema.

pub mod accounts;
pub mod exchange_details;
pub mod ledger;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod transfer_details;
pub mod users;
