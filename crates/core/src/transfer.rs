//! The Transfer domain service: same-currency movement of funds between two accounts.

use chrono::{DateTime, Utc};

use ledger_shared::{Money, TransactionId, TransferDetailsId};

use crate::account::Account;
use crate::error::CoreError;
use crate::model::{LedgerRecord, Transaction, TransactionType, TransferDetails};

/// The fully formed output of a transfer: the anchor transaction, its details, and the
/// balanced ledger entries that must accompany it. Nothing here has touched storage.
#[derive(Debug, Clone)]
pub struct TransferDescriptor {
    /// The anchor transaction, of type [`TransactionType::Transfer`].
    pub transaction: Transaction,
    /// The transfer details row.
    pub details: TransferDetails,
    /// The two-record balanced ledger entry: `(sender, -amount)` and `(recipient, +amount)`.
    pub ledger_records: Vec<LedgerRecord>,
}

/// Stateless domain service executing transfers against in-memory account aggregates.
pub struct TransferService;

impl TransferService {
    /// Executes a transfer of `amount` from `sender` to `recipient`, both already locked in
    /// storage by the caller.
    ///
    /// Mutates `sender` and `recipient` in place. On any error, the caller's unit of work is
    /// responsible for discarding those in-memory changes — nothing here is persisted.
    ///
    /// A zero-amount transfer is *not* rejected here: the storage layer's positive-amount
    /// check on `transfer_details.amount` is the single source of truth for positivity at
    /// the persistence boundary.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NegativeTransfer`] if `amount` is negative,
    /// [`CoreError::CurrencyMismatch`] if `amount`'s currency doesn't match both accounts, or
    /// [`CoreError::InsufficientFunds`] if the sender cannot cover the debit.
    pub fn transfer(
        sender: &mut Account,
        recipient: &mut Account,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<TransferDescriptor, CoreError> {
        if amount.is_negative() {
            return Err(CoreError::NegativeTransfer);
        }

        sender.debit(amount)?;
        recipient.credit(amount)?;

        let transaction_id = TransactionId::new();
        let transaction = Transaction {
            id: transaction_id,
            transaction_type: TransactionType::Transfer,
            account_id: sender.id,
            timestamp: now,
        };

        let details = TransferDetails {
            id: TransferDetailsId::new(),
            transaction_id,
            sender_account_id: sender.id,
            recipient_account_id: recipient.id,
            money: amount,
        };

        let ledger_records = vec![
            LedgerRecord {
                id: ledger_shared::LedgerRecordId::new(),
                transaction_id,
                account_id: sender.id,
                money: amount.negate(),
                timestamp: now,
            },
            LedgerRecord {
                id: ledger_shared::LedgerRecordId::new(),
                transaction_id,
                account_id: recipient.id,
                money: amount,
                timestamp: now,
            },
        ];

        crate::reconciliation::assert_balanced_entry_set(&ledger_records)?;

        Ok(TransferDescriptor {
            transaction,
            details,
            ledger_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_shared::{AccountId, Currency, UserId};
    use rust_decimal_macros::dec;

    fn account(balance: rust_decimal::Decimal) -> Account {
        Account::new(
            AccountId::new(),
            UserId::new(),
            Money::new(balance, Currency::Usd),
        )
    }

    #[test]
    fn transfer_moves_funds_and_builds_balanced_entries() {
        let mut sender = account(dec!(1000.00));
        let mut recipient = account(dec!(1000.00));
        let now = Utc::now();

        let descriptor =
            TransferService::transfer(&mut sender, &mut recipient, Money::new(dec!(100.00), Currency::Usd), now)
                .unwrap();

        assert_eq!(sender.balance.amount, dec!(900.00));
        assert_eq!(recipient.balance.amount, dec!(1100.00));
        assert_eq!(descriptor.ledger_records.len(), 2);
        assert_eq!(descriptor.ledger_records[0].money.amount, dec!(-100.00));
        assert_eq!(descriptor.ledger_records[1].money.amount, dec!(100.00));
        assert_eq!(descriptor.details.sender_account_id, sender.id);
        assert_eq!(descriptor.details.recipient_account_id, recipient.id);
    }

    #[test]
    fn transfer_rejects_negative_amount() {
        let mut sender = account(dec!(1000.00));
        let mut recipient = account(dec!(1000.00));
        let err = TransferService::transfer(
            &mut sender,
            &mut recipient,
            Money::new(dec!(-1.00), Currency::Usd),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NegativeTransfer));
    }

    #[test]
    fn transfer_allows_zero_amount_at_the_domain_layer() {
        let mut sender = account(dec!(1000.00));
        let mut recipient = account(dec!(1000.00));
        let result = TransferService::transfer(
            &mut sender,
            &mut recipient,
            Money::new(dec!(0.00), Currency::Usd),
            Utc::now(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn transfer_rejects_insufficient_funds() {
        let mut sender = account(dec!(50.00));
        let mut recipient = account(dec!(1000.00));
        let err = TransferService::transfer(
            &mut sender,
            &mut recipient,
            Money::new(dec!(100.00), Currency::Usd),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
        // Nothing should have been mutated past the failing debit attempt.
        assert_eq!(sender.balance.amount, dec!(50.00));
    }

    #[test]
    fn transfer_rejects_currency_mismatch_against_recipient() {
        let mut sender = account(dec!(1000.00));
        let mut recipient = Account::new(
            AccountId::new(),
            UserId::new(),
            Money::new(dec!(1000.00), Currency::Eur),
        );
        let err = TransferService::transfer(
            &mut sender,
            &mut recipient,
            Money::new(dec!(100.00), Currency::Usd),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::CurrencyMismatch { .. }));
    }
}
