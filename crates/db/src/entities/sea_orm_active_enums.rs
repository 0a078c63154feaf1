//! `SeaORM` active enums mirroring the Postgres enum types in the initial migration.

use sea_orm::entity::prelude::*;

/// The two currencies this core recognizes, as a Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency")]
pub enum Currency {
    /// US Dollar.
    #[sea_orm(string_value = "USD")]
    Usd,
    /// Euro.
    #[sea_orm(string_value = "EUR")]
    Eur,
}

impl From<ledger_shared::Currency> for Currency {
    fn from(value: ledger_shared::Currency) -> Self {
        match value {
            ledger_shared::Currency::Usd => Self::Usd,
            ledger_shared::Currency::Eur => Self::Eur,
        }
    }
}

impl From<Currency> for ledger_shared::Currency {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Usd => Self::Usd,
            Currency::Eur => Self::Eur,
        }
    }
}

/// The kind of operation a transaction anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    /// A same-currency movement of funds between two accounts.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// A cross-currency conversion intermediated by cashbook accounts.
    #[sea_orm(string_value = "exchange")]
    Exchange,
    /// Reserved; not produced by any operation in this core.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Reserved; not produced by any operation in this core.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<ledger_core::TransactionType> for TransactionType {
    fn from(value: ledger_core::TransactionType) -> Self {
        match value {
            ledger_core::TransactionType::Transfer => Self::Transfer,
            ledger_core::TransactionType::Exchange => Self::Exchange,
            ledger_core::TransactionType::Deposit => Self::Deposit,
            ledger_core::TransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<TransactionType> for ledger_core::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Transfer => Self::Transfer,
            TransactionType::Exchange => Self::Exchange,
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}
