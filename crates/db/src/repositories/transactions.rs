//! Transaction history read model (§4.7).

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use ledger_core::{CoreError, ExchangeDetails, Transaction, TransactionType, TransferDetails};
use ledger_shared::{Money, TransactionId, UserId};

use crate::entities::{accounts, exchange_details, transactions, transfer_details};
use crate::unit_of_work::{Handle, HandleConnection};

/// Filter for [`TransactionRepository::get_list`] / [`TransactionRepository::count`].
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    /// Required: scopes every result to this user.
    pub user_id: UserId,
    /// Optional: restricts to one transaction kind.
    pub transaction_type: Option<TransactionType>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// One row of transaction history, joined with whichever details row applies.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// The anchor transaction.
    pub transaction: Transaction,
    /// Present when `transaction.transaction_type` is [`TransactionType::Transfer`].
    pub transfer: Option<TransferDetails>,
    /// Present when `transaction.transaction_type` is [`TransactionType::Exchange`].
    pub exchange: Option<ExchangeDetails>,
}

/// Storage adapter for transaction history reads.
#[derive(Debug, Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    /// Returns the user-scoped, paginated transaction history, ordered `timestamp DESC`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_list(
        &self,
        handle: &Handle,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, CoreError> {
        let candidate_ids = self.candidate_transaction_ids(handle, filter.user_id).await?;
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = transactions::Entity::find().filter(transactions::Column::Id.is_in(candidate_ids));
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(
                crate::entities::sea_orm_active_enums::TransactionType::from(transaction_type),
            ));
        }
        let query = query
            .order_by_desc(transactions::Column::Timestamp)
            .limit(filter.limit)
            .offset(filter.offset);

        let rows = match handle.connection() {
            HandleConnection::Pool(c) => query.all(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                query.all(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        self.attach_details(handle, rows).await
    }

    /// Returns the total number of transactions matching `filter` (ignoring `limit`/`offset`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn count(&self, handle: &Handle, filter: &TransactionFilter) -> Result<u64, CoreError> {
        let candidate_ids = self.candidate_transaction_ids(handle, filter.user_id).await?;
        if candidate_ids.is_empty() {
            return Ok(0);
        }

        let mut query = transactions::Entity::find().filter(transactions::Column::Id.is_in(candidate_ids));
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(
                crate::entities::sea_orm_active_enums::TransactionType::from(transaction_type),
            ));
        }

        match handle.connection() {
            HandleConnection::Pool(c) => query.count(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                query.count(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))
    }

    /// Every transaction ID visible to `user_id`: initiated by one of their accounts, a
    /// transfer recipient of one of their accounts, or an exchange target of one of their
    /// accounts.
    async fn candidate_transaction_ids(
        &self,
        handle: &Handle,
        user_id: UserId,
    ) -> Result<Vec<uuid::Uuid>, CoreError> {
        let owned_accounts: Vec<uuid::Uuid> = match handle.connection() {
            HandleConnection::Pool(c) => {
                accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(user_id.into_inner()))
                    .all(c)
                    .await
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(user_id.into_inner()))
                    .all(txn)
                    .await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?
        .into_iter()
        .map(|a| a.id)
        .collect();

        if owned_accounts.is_empty() {
            return Ok(Vec::new());
        }

        let initiated = transactions::Entity::find()
            .filter(transactions::Column::AccountId.is_in(owned_accounts.clone()))
            .select_only()
            .column(transactions::Column::Id);

        let as_recipient = transfer_details::Entity::find()
            .filter(transfer_details::Column::RecipientAccountId.is_in(owned_accounts.clone()))
            .select_only()
            .column(transfer_details::Column::TransactionId);

        let as_target = exchange_details::Entity::find()
            .filter(exchange_details::Column::TargetAccountId.is_in(owned_accounts))
            .select_only()
            .column(exchange_details::Column::TransactionId);

        let mut ids = std::collections::HashSet::new();

        match handle.connection() {
            HandleConnection::Pool(c) => {
                ids.extend(
                    initiated
                        .into_tuple::<uuid::Uuid>()
                        .all(c)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
                ids.extend(
                    as_recipient
                        .into_tuple::<uuid::Uuid>()
                        .all(c)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
                ids.extend(
                    as_target
                        .into_tuple::<uuid::Uuid>()
                        .all(c)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                ids.extend(
                    initiated
                        .into_tuple::<uuid::Uuid>()
                        .all(txn)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
                ids.extend(
                    as_recipient
                        .into_tuple::<uuid::Uuid>()
                        .all(txn)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
                ids.extend(
                    as_target
                        .into_tuple::<uuid::Uuid>()
                        .all(txn)
                        .await
                        .map_err(|e| CoreError::Database(e.to_string()))?,
                );
            }
        }

        Ok(ids.into_iter().collect())
    }

    async fn attach_details(
        &self,
        handle: &Handle,
        rows: Vec<transactions::Model>,
    ) -> Result<Vec<TransactionRecord>, CoreError> {
        let ids: Vec<uuid::Uuid> = rows.iter().map(|r| r.id).collect();

        let (transfer_rows, exchange_rows): (
            Vec<transfer_details::Model>,
            Vec<exchange_details::Model>,
        ) = match handle.connection() {
            HandleConnection::Pool(c) => {
                let transfers = transfer_details::Entity::find()
                    .filter(transfer_details::Column::TransactionId.is_in(ids.clone()))
                    .all(c)
                    .await
                    .map_err(|e| CoreError::Database(e.to_string()))?;
                let exchanges = exchange_details::Entity::find()
                    .filter(exchange_details::Column::TransactionId.is_in(ids))
                    .all(c)
                    .await
                    .map_err(|e| CoreError::Database(e.to_string()))?;
                (transfers, exchanges)
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                let transfers = transfer_details::Entity::find()
                    .filter(transfer_details::Column::TransactionId.is_in(ids.clone()))
                    .all(txn)
                    .await
                    .map_err(|e| CoreError::Database(e.to_string()))?;
                let exchanges = exchange_details::Entity::find()
                    .filter(exchange_details::Column::TransactionId.is_in(ids))
                    .all(txn)
                    .await
                    .map_err(|e| CoreError::Database(e.to_string()))?;
                (transfers, exchanges)
            }
        };

        let mut transfers_by_txn: HashMap<uuid::Uuid, transfer_details::Model> =
            transfer_rows.into_iter().map(|r| (r.transaction_id, r)).collect();
        let mut exchanges_by_txn: HashMap<uuid::Uuid, exchange_details::Model> =
            exchange_rows.into_iter().map(|r| (r.transaction_id, r)).collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let transaction = Transaction {
                    id: TransactionId::from(row.id),
                    transaction_type: row.transaction_type.into(),
                    account_id: row.account_id.into(),
                    timestamp: row.timestamp.with_timezone(&Utc),
                };

                let transfer = transfers_by_txn.remove(&row.id).map(|t| TransferDetails {
                    id: t.id.into(),
                    transaction_id: t.transaction_id.into(),
                    sender_account_id: transaction.account_id,
                    recipient_account_id: t.recipient_account_id.into(),
                    money: Money::new(t.amount, t.currency.into()),
                });

                let exchange = exchanges_by_txn.remove(&row.id).map(|e| ExchangeDetails {
                    id: e.id.into(),
                    transaction_id: e.transaction_id.into(),
                    source_account_id: e.source_account_id.into(),
                    target_account_id: e.target_account_id.into(),
                    source_amount: Money::new(e.source_amount, e.source_currency.into()),
                    target_amount: Money::new(e.target_amount, e.target_currency.into()),
                });

                TransactionRecord {
                    transaction,
                    transfer,
                    exchange,
                }
            })
            .collect())
    }
}
