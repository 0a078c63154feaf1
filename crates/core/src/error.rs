//! Domain error taxonomy for the ledger core.
//!
//! Mirrors the reference codebase's per-domain error enum (validation / not-found / business /
//! invariant / storage) with `error_code`, `http_status_code`, and `is_retryable` metadata, so
//! an adapter can map these to a transport without the core knowing about HTTP.

use rust_decimal::Decimal;
use thiserror::Error;

use ledger_shared::{AccountId, Currency, MoneyError};

/// Errors produced by the ledger core's domain services and invariant checks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The two operands of a Money operation do not share a currency.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// The currency the operation required.
        expected: Currency,
        /// The currency that was actually supplied.
        found: Currency,
    },

    /// A currency outside the recognized set ({USD, EUR}) was requested.
    #[error("unsupported currency")]
    UnsupportedCurrency,

    /// A transfer was requested with a negative amount.
    #[error("transfer amount must not be negative")]
    NegativeTransfer,

    /// An exchange was requested with a negative amount.
    #[error("exchange amount must not be negative")]
    NegativeExchange,

    /// An exchange was requested with a zero amount.
    #[error("exchange amount must not be zero")]
    ZeroAmountExchange,

    /// An exchange was requested between two accounts sharing a currency.
    #[error("source and target accounts share a currency")]
    SameCurrencyExchange,

    /// An exchange rate was constructed (or requested) with `from == to`.
    #[error("exchange rate must have distinct currencies")]
    SameCurrencyExchangeRate,

    /// An exchange rate was constructed with a non-positive rate.
    #[error("exchange rate must be strictly positive")]
    InvalidExchangeRate,

    /// No rate is available for the requested currency pair.
    #[error("no exchange rate available for {from} to {to}")]
    ExchangeRateNotFound {
        /// Source currency of the requested rate.
        from: Currency,
        /// Target currency of the requested rate.
        to: Currency,
    },

    /// A user record could not be found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// An account record could not be found.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// A debit would take a non-cashbook account's balance below zero.
    #[error("insufficient funds in account {account_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The account that lacked sufficient funds.
        account_id: AccountId,
        /// The amount that was requested.
        requested: Decimal,
        /// The amount actually available.
        available: Decimal,
    },

    /// A currency's ledger records do not sum to zero. Fatal to the unit of work.
    #[error("ledger imbalance in {currency}: sum is {sum}, expected 0")]
    LedgerImbalance {
        /// The currency whose ledger records failed to balance.
        currency: Currency,
        /// The non-zero sum that was observed.
        sum: Decimal,
    },

    /// An account's in-memory balance disagrees with the sum of its ledger records.
    /// Fatal to the unit of work.
    #[error(
        "account {account_id} balance mismatch: account balance {account_balance}, ledger balance {ledger_balance}"
    )]
    AccountBalanceMismatch {
        /// The account whose balance and ledger disagree.
        account_id: AccountId,
        /// The balance recorded on the account itself.
        account_balance: Decimal,
        /// The balance derived from summing its ledger records.
        ledger_balance: Decimal,
    },

    /// Registration was attempted for an email that already exists.
    #[error("a user with this email already exists")]
    UserAlreadyExists,

    /// Authentication was attempted with invalid credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A repository that requires an active transaction was invoked without one.
    /// This is a programmer error, not a user-facing one.
    #[error("repository operation requires an active unit of work")]
    UnitOfWorkMisuse,

    /// An underlying storage operation failed.
    #[error("storage error: {0}")]
    Database(String),
}

impl From<MoneyError> for CoreError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::CurrencyMismatch { expected, found } => {
                Self::CurrencyMismatch { expected, found }
            }
            MoneyError::UnsupportedCurrency => Self::UnsupportedCurrency,
        }
    }
}

impl CoreError {
    /// A stable, machine-readable error tag suitable for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CurrencyMismatch { .. } => "currency_mismatch",
            Self::UnsupportedCurrency => "unsupported_currency",
            Self::NegativeTransfer => "negative_transfer",
            Self::NegativeExchange => "negative_exchange",
            Self::ZeroAmountExchange => "zero_amount_exchange",
            Self::SameCurrencyExchange => "same_currency_exchange",
            Self::SameCurrencyExchangeRate => "same_currency_exchange_rate",
            Self::InvalidExchangeRate => "invalid_exchange_rate",
            Self::ExchangeRateNotFound { .. } => "exchange_rate_not_found",
            Self::UserNotFound(_) => "user_not_found",
            Self::AccountNotFound(_) => "account_not_found",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::LedgerImbalance { .. } => "ledger_imbalance",
            Self::AccountBalanceMismatch { .. } => "account_balance_mismatch",
            Self::UserAlreadyExists => "user_already_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UnitOfWorkMisuse => "unit_of_work_misuse",
            Self::Database(_) => "database_error",
        }
    }

    /// The HTTP status an adapter should map this error to.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::CurrencyMismatch { .. }
            | Self::UnsupportedCurrency
            | Self::NegativeTransfer
            | Self::NegativeExchange
            | Self::ZeroAmountExchange
            | Self::SameCurrencyExchange
            | Self::SameCurrencyExchangeRate
            | Self::InvalidExchangeRate => 400,
            Self::UserNotFound(_) | Self::AccountNotFound(_) | Self::ExchangeRateNotFound { .. } => {
                404
            }
            Self::InsufficientFunds { .. }
            | Self::AccountBalanceMismatch { .. }
            | Self::UserAlreadyExists => 409,
            Self::InvalidCredentials => 401,
            Self::LedgerImbalance { .. } | Self::UnitOfWorkMisuse | Self::Database(_) => 500,
        }
    }

    /// True if retrying the surrounding unit of work might succeed without intervention.
    ///
    /// Only transient storage failures are retryable; invariant violations and validation
    /// errors never are.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violations_are_not_retryable() {
        let err = CoreError::LedgerImbalance {
            currency: Currency::Usd,
            sum: Decimal::ONE,
        };
        assert!(!err.is_retryable());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "ledger_imbalance");
    }

    #[test]
    fn insufficient_funds_maps_to_conflict() {
        let err = CoreError::InsufficientFunds {
            account_id: AccountId::new(),
            requested: Decimal::ONE,
            available: Decimal::ZERO,
        };
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn money_error_converts_into_core_error() {
        let money_err = MoneyError::CurrencyMismatch {
            expected: Currency::Usd,
            found: Currency::Eur,
        };
        let core_err: CoreError = money_err.into();
        assert_eq!(core_err.error_code(), "currency_mismatch");
    }
}
