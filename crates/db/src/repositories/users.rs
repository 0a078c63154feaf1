//! User repository (§4.7).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use ledger_core::CoreError;
use ledger_shared::UserId;

use crate::entities::users;
use crate::unit_of_work::{Handle, HandleConnection};

/// Storage adapter for users.
#[derive(Debug, Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UserNotFound`] if no user has this email, or
    /// [`CoreError::Database`] on a storage failure.
    pub async fn get_by_email(&self, handle: &Handle, email: &str) -> Result<users::Model, CoreError> {
        let found = match handle.connection() {
            HandleConnection::Pool(c) => {
                users::Entity::find()
                    .filter(users::Column::Email.eq(email))
                    .one(c)
                    .await
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                users::Entity::find()
                    .filter(users::Column::Email.eq(email))
                    .one(txn)
                    .await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        found.ok_or_else(|| CoreError::UserNotFound(email.to_string()))
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UserNotFound`] if absent, or [`CoreError::Database`] on a
    /// storage failure.
    pub async fn get_by_id(&self, handle: &Handle, id: UserId) -> Result<users::Model, CoreError> {
        let found = match handle.connection() {
            HandleConnection::Pool(c) => users::Entity::find_by_id(id.into_inner()).one(c).await,
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                users::Entity::find_by_id(id.into_inner()).one(txn).await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        found.ok_or_else(|| CoreError::UserNotFound(id.to_string()))
    }

    /// Upserts a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn save(
        &self,
        handle: &Handle,
        id: UserId,
        email: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<users::Model, CoreError> {
        let active = users::ActiveModel {
            id: Set(id.into_inner()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = match handle.connection() {
            HandleConnection::Pool(c) => {
                users::Entity::insert(active)
                    .on_conflict(
                        sea_orm::sea_query::OnConflict::column(users::Column::Id)
                            .update_columns([
                                users::Column::Email,
                                users::Column::PasswordHash,
                                users::Column::UpdatedAt,
                            ])
                            .to_owned(),
                    )
                    .exec_with_returning(c)
                    .await
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                users::Entity::insert(active)
                    .on_conflict(
                        sea_orm::sea_query::OnConflict::column(users::Column::Id)
                            .update_columns([
                                users::Column::Email,
                                users::Column::PasswordHash,
                                users::Column::UpdatedAt,
                            ])
                            .to_owned(),
                    )
                    .exec_with_returning(txn)
                    .await
            }
        };

        result.map_err(|e| CoreError::Database(e.to_string()))
    }

    /// Checks whether `email` is already registered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] on a storage failure.
    pub async fn exists_by_email(&self, handle: &Handle, email: &str) -> Result<bool, CoreError> {
        let count = match handle.connection() {
            HandleConnection::Pool(c) => {
                users::Entity::find()
                    .filter(users::Column::Email.eq(email))
                    .count(c)
                    .await
            }
            HandleConnection::Transaction(slot) => {
                let guard = slot.lock().await;
                let txn = guard.as_ref().expect("active transaction missing");
                users::Entity::find()
                    .filter(users::Column::Email.eq(email))
                    .count(txn)
                    .await
            }
        }
        .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}
