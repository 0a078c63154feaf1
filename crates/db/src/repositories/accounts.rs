//! Account repository (§4.7).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LockType, PaginatorTrait, QueryFilter, QuerySelect,
    Set,
};

use ledger_core::{Account, CoreError};
use ledger_shared::{AccountId, Currency, UserId};

use crate::entities::accounts;
use crate::unit_of_work::{Handle, HandleConnection};

/// Storage adapter for accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountRepository;

impl AccountRepository {
    /// Finds an account without locking it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AccountNotFound`] if absent, or [`CoreError::Database`] on a
    /// storage failure.
    pub async fn get(&self, handle: &Handle, id: AccountId) -> Result<Account, CoreError> {
        let found = match handle.connection() {
            HandleConnection::Pool(c) => accounts::Entity::find_by_id(id.into_inner()).one(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::find_by_id(id.into_inner()).one(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        found
            .map(accounts::Model::into_domain)
            .ok_or(CoreError::AccountNotFound(id))
    }

    /// Finds an account and acquires a row-level exclusive lock (`SELECT ... FOR UPDATE`).
    ///
    /// Must be called with an active unit of work bound, or the lock is a no-op against the
    /// ambient pool and is released the instant the query completes. Callers that need the
    /// lock to actually hold must invoke this from inside [`crate::unit_of_work::UnitOfWork::execute`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AccountNotFound`] if absent, or [`CoreError::Database`] on a
    /// storage failure.
    pub async fn get_for_update(&self, handle: &Handle, id: AccountId) -> Result<Account, CoreError> {
        let found = match handle.connection() {
            HandleConnection::Pool(_) => return Err(CoreError::UnitOfWorkMisuse),
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::find_by_id(id.into_inner())
                    .lock(LockType::Update)
                    .one(txn)
                    .await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        found
            .map(accounts::Model::into_domain)
            .ok_or(CoreError::AccountNotFound(id))
    }

    /// Lists every account owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn get_by_user_id(
        &self,
        handle: &Handle,
        user_id: UserId,
    ) -> Result<Vec<Account>, CoreError> {
        let found = match handle.connection() {
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
        .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(found.into_iter().map(accounts::Model::into_domain).collect())
    }

    /// Upserts an account's balance by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn save(&self, handle: &Handle, account: &Account) -> Result<(), CoreError> {
        let active = accounts::ActiveModel {
            id: Set(account.id.into_inner()),
            user_id: Set(account.user_id.into_inner()),
            balance: Set(account.balance.amount),
            currency: Set(account.balance.currency.into()),
        };

        let conflict = sea_orm::sea_query::OnConflict::column(accounts::Column::Id)
            .update_columns([accounts::Column::Balance])
            .to_owned();

        let result = match handle.connection() {
            HandleConnection::Pool(c) => {
                accounts::Entity::insert(active)
                    .on_conflict(conflict)
                    .exec(c)
                    .await
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::insert(active)
                    .on_conflict(conflict)
                    .exec(txn)
                    .await
            }
        };

        result
            .map(|_| ())
            .map_err(|e| CoreError::Database(e.to_string()))
    }

    /// Counts accounts owned by `user_id` in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn count(
        &self,
        handle: &Handle,
        user_id: UserId,
        currency: Currency,
    ) -> Result<u64, CoreError> {
        let filter = accounts::Column::UserId.eq(user_id.into_inner()).and(
            accounts::Column::Currency
                .eq(crate::entities::sea_orm_active_enums::Currency::from(currency)),
        );

        match handle.connection() {
            HandleConnection::Pool(c) => accounts::Entity::find().filter(filter).count(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                accounts::Entity::find().filter(filter).count(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))
    }
}
