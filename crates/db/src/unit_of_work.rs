//! The context-propagated unit of work (§4.6).
//!
//! The reference codebase threads an explicit `&DatabaseTransaction` through every
//! repository call. This core binds the active transaction into a task-local cell instead,
//! scoped to the async task tree rooted at [`UnitOfWork::execute`], so repository method
//! signatures carry a [`Handle`] rather than a transaction parameter. The transaction itself
//! is held behind an `Arc<Mutex<Option<_>>>` so it can be taken back out, by value, for the
//! final commit or rollback once the closure's future has resolved — `tokio::task_local!`
//! only ever hands out borrows, and `commit`/`rollback` both consume `self`.

use std::future::Future;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tokio::sync::Mutex;
use tracing::{Instrument, info_span, warn};

use ledger_core::CoreError;

tokio::task_local! {
    static ACTIVE_TXN: Arc<Mutex<Option<DatabaseTransaction>>>;
}

fn db_error(err: DbErr) -> CoreError {
    CoreError::Database(err.to_string())
}

/// The connection a repository should issue its next query against.
pub enum HandleConnection<'a> {
    /// No unit of work is bound for the current task; use the ambient pool.
    Pool(&'a DatabaseConnection),
    /// A unit of work is bound; the transaction must be locked to borrow it.
    Transaction(Arc<Mutex<Option<DatabaseTransaction>>>),
}

/// A cheap, cloneable accessor repositories use instead of taking a transaction parameter.
#[derive(Clone)]
pub struct Handle {
    pool: DatabaseConnection,
}

impl Handle {
    /// Wraps the ambient pool connection.
    #[must_use]
    pub const fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Returns the connection to use right now.
    ///
    /// # Panics
    ///
    /// A caller that matches [`HandleConnection::Transaction`] and then finds the inner
    /// `Option` empty has called this after the unit of work already took the transaction
    /// back for commit — that is a programmer error in this crate, not a caller mistake.
    #[must_use]
    pub fn connection(&self) -> HandleConnection<'_> {
        match ACTIVE_TXN.try_with(Arc::clone) {
            Ok(slot) => HandleConnection::Transaction(slot),
            Err(_) => HandleConnection::Pool(&self.pool),
        }
    }

    /// True if a unit of work is currently bound for this task.
    #[must_use]
    pub fn has_active_transaction(&self) -> bool {
        ACTIVE_TXN.try_with(|_| ()).is_ok()
    }
}

/// Opens one storage transaction, binds it ambiently, and runs `f` against a [`Handle`].
///
/// On `Ok`, commits. On `Err`, rolls back and returns the error unchanged. Nested calls
/// (an `execute` invoked while already inside one) reuse the outer binding rather than
/// opening a savepoint — see §4.6's "nested transactions" note.
pub struct UnitOfWork {
    pool: DatabaseConnection,
}

impl UnitOfWork {
    /// Wraps a connection pool.
    #[must_use]
    pub const fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// A [`Handle`] usable outside any unit of work (read-only repositories, previews).
    #[must_use]
    pub fn handle(&self) -> Handle {
        Handle::new(self.pool.clone())
    }

    /// Runs `f` inside one atomic unit of work.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns, or a [`CoreError::Database`] if the transaction
    /// could not be opened, committed, or (best-effort) rolled back.
    pub async fn execute<F, Fut, T>(&self, operation: &'static str, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Handle) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        if ACTIVE_TXN.try_with(|_| ()).is_ok() {
            // Already inside a unit of work on this task: reuse it, no savepoint.
            return f(self.handle()).await;
        }

        let span = info_span!("unit_of_work", operation);
        async move {
            let txn = self.pool.begin().await.map_err(db_error)?;
            let slot = Arc::new(Mutex::new(Some(txn)));
            let handle = Handle::new(self.pool.clone());

            let result = ACTIVE_TXN.scope(slot.clone(), f(handle)).await;

            let txn = slot
                .lock()
                .await
                .take()
                .expect("unit of work transaction slot emptied before commit/rollback");

            match result {
                Ok(value) => {
                    txn.commit().await.map_err(db_error)?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!(%rollback_err, "rollback failed after operation error");
                    }
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

// Commit/rollback and nested-reuse behavior require a live connection pool and are
// exercised in this crate's tests/ directory behind a reachable DATABASE_URL.
