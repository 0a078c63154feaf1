//! Pure data descriptors produced by the domain services.
//!
//! None of these types touch storage. A domain service builds one of these, the unit of
//! work and repositories persist it, and nothing else constructs them.

use chrono::{DateTime, Utc};

use ledger_shared::{
    AccountId, ExchangeDetailsId, LedgerRecordId, Money, TransactionId, TransferDetailsId, UserId,
};

/// The kind of operation a [`Transaction`] anchors.
///
/// `Deposit` and `Withdrawal` are reserved vocabulary: the schema and this enum carry them,
/// but no operation in this core produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// A same-currency movement of funds between two accounts.
    Transfer,
    /// A cross-currency conversion intermediated by cashbook accounts.
    Exchange,
    /// Reserved; not produced by any operation in this core.
    Deposit,
    /// Reserved; not produced by any operation in this core.
    Withdrawal,
}

/// The anchor row for every operation.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// The kind of operation this transaction anchors.
    pub transaction_type: TransactionType,
    /// The account that initiated the operation.
    pub account_id: AccountId,
    /// When the operation occurred.
    pub timestamp: DateTime<Utc>,
}

/// Details of a same-currency transfer between two accounts.
#[derive(Debug, Clone)]
pub struct TransferDetails {
    /// Unique identifier.
    pub id: TransferDetailsId,
    /// The transaction this details row belongs to.
    pub transaction_id: TransactionId,
    /// The account the funds left.
    pub sender_account_id: AccountId,
    /// The account the funds arrived at.
    pub recipient_account_id: AccountId,
    /// The amount moved, strictly positive (I3).
    pub money: Money,
}

/// Details of a cross-currency exchange between two accounts belonging to one user.
#[derive(Debug, Clone)]
pub struct ExchangeDetails {
    /// Unique identifier.
    pub id: ExchangeDetailsId,
    /// The transaction this details row belongs to.
    pub transaction_id: TransactionId,
    /// The account the source funds left.
    pub source_account_id: AccountId,
    /// The account the converted funds arrived at.
    pub target_account_id: AccountId,
    /// The amount debited from the source account, strictly positive (I3).
    pub source_amount: Money,
    /// The amount credited to the target account, strictly positive (I3).
    pub target_amount: Money,
}

impl ExchangeDetails {
    /// The effective rate applied, derived as `target_amount / source_amount`.
    ///
    /// Stored for reporting only; never used to recompute amounts.
    #[must_use]
    pub fn effective_rate(&self) -> rust_decimal::Decimal {
        self.target_amount.amount / self.source_amount.amount
    }
}

/// An append-only, signed entry tying a monetary delta to an account and a transaction.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    /// Unique identifier.
    pub id: LedgerRecordId,
    /// The transaction this record was emitted by.
    pub transaction_id: TransactionId,
    /// The account this record applies to.
    pub account_id: AccountId,
    /// The signed delta applied to the account's balance; may be negative.
    pub money: Money,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
}

/// Returns whether `user_id` is the reserved system user owning the cashbook accounts.
#[must_use]
pub fn is_cashbook_user(user_id: UserId) -> bool {
    user_id == ledger_shared::types::id::cashbook_user_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_shared::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn effective_rate_is_target_over_source() {
        let details = ExchangeDetails {
            id: ExchangeDetailsId::new(),
            transaction_id: TransactionId::new(),
            source_account_id: AccountId::new(),
            target_account_id: AccountId::new(),
            source_amount: Money::new(dec!(100.00), Currency::Usd),
            target_amount: Money::new(dec!(92.00), Currency::Eur),
        };
        assert_eq!(details.effective_rate(), dec!(0.92));
    }

    #[test]
    fn cashbook_user_is_recognized() {
        assert!(is_cashbook_user(ledger_shared::types::id::cashbook_user_id()));
        assert!(!is_cashbook_user(UserId::new()));
    }
}
