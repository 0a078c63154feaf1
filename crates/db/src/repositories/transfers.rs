//! Transfer repository (§4.7).

use sea_orm::{ActiveModelTrait, Set};

use ledger_core::{CoreError, TransferDescriptor};

use crate::entities::{ledger, transactions, transfer_details};
use crate::unit_of_work::{Handle, HandleConnection};

/// Storage adapter persisting the output of [`ledger_core::TransferService`].
#[derive(Debug, Clone, Default)]
pub struct TransferRepository;

impl TransferRepository {
    /// Writes the transaction row, the transfer details row, and the two ledger records as
    /// a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnitOfWorkMisuse`] if no transaction is bound, or
    /// [`CoreError::Database`] on a storage failure.
    pub async fn insert(
        &self,
        handle: &Handle,
        descriptor: &TransferDescriptor,
    ) -> Result<(), CoreError> {
        let slot = match handle.connection() {
            HandleConnection::Pool(_) => return Err(CoreError::UnitOfWorkMisuse),
            HandleConnection::Transaction(slot) => slot,
        };
        let guard = slot.lock().await;
        let txn = guard.as_ref().expect("active transaction missing");

        let transaction_active = transactions::ActiveModel {
            id: Set(descriptor.transaction.id.into_inner()),
            transaction_type: Set(descriptor.transaction.transaction_type.into()),
            account_id: Set(descriptor.transaction.account_id.into_inner()),
            timestamp: Set(descriptor.transaction.timestamp.into()),
        };
        transaction_active
            .insert(txn)
            .await
            .map_err(|e| CoreError::Database(e.to_string()))?;

        let details_active = transfer_details::ActiveModel {
            id: Set(descriptor.details.id.into_inner()),
            transaction_id: Set(descriptor.details.transaction_id.into_inner()),
            recipient_account_id: Set(descriptor.details.recipient_account_id.into_inner()),
            amount: Set(descriptor.details.money.amount),
            currency: Set(descriptor.details.money.currency.into()),
        };
        details_active
            .insert(txn)
            .await
            .map_err(|e| CoreError::Database(e.to_string()))?;

        for record in &descriptor.ledger_records {
            let ledger_active = ledger::ActiveModel {
                id: Set(record.id.into_inner()),
                transaction_id: Set(record.transaction_id.into_inner()),
                account_id: Set(record.account_id.into_inner()),
                amount: Set(record.money.amount),
                currency: Set(record.money.currency.into()),
                timestamp: Set(record.timestamp.into()),
            };
            ledger_active
                .insert(txn)
                .await
                .map_err(|e| CoreError::Database(e.to_string()))?;
        }

        Ok(())
    }
}
