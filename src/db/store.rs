use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;
use log::{debug, error, info, warn};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
};
use tokio::time::{timeout_at, Instant};

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Connection pool plus the deadline applied to every operation run through it.
///
/// Connections are checked out for exactly one `run`, `run_snapshot` or
/// `run_in_transaction` call and go back to the pool on every exit path,
/// including timeouts.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    deadline: Duration,
}

impl Store {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Store { pool, deadline }
    }

    pub async fn connect(config: &Config) -> AppResult<Self> {
        info!("Opening database pool with {} connections", config.pool_size);
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.db_timeout)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.db_timeout)
            .connect_with(options)
            .await?;

        Ok(Store::new(pool, config.db_timeout))
    }

    pub async fn migrate(&self) -> AppResult<()> {
        debug!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs `op` on one pooled connection under the store deadline.
    pub async fn run<T, F>(&self, op: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, AppResult<T>>,
    {
        let work = async {
            let mut conn = self.pool.acquire().await?;
            op(&mut *conn).await
        };
        self.within(Instant::now() + self.deadline, work).await
    }

    /// Runs read-only `op` inside a deferred transaction so every query sees
    /// the same snapshot. Never takes the write lock.
    pub async fn run_snapshot<T, F>(&self, op: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, AppResult<T>>,
    {
        let work = async {
            let mut tx = self.pool.begin().await?;
            let value = op(&mut *tx).await?;
            tx.commit().await?;
            Ok(value)
        };
        self.within(Instant::now() + self.deadline, work).await
    }

    /// Runs `unit` inside a write transaction.
    ///
    /// The transaction starts with `BEGIN IMMEDIATE`, so concurrent writers queue
    /// on the database lock instead of failing when a read snapshot goes stale.
    /// One deadline covers checkout, `BEGIN`, the unit and `COMMIT`.
    ///
    /// Commits when `unit` succeeds. When it fails (or runs past the deadline) the
    /// transaction is rolled back and the unit's error is returned; if the rollback
    /// fails as well both errors are reported through `AppError::Rollback`.
    /// Dropping the returned future mid-flight closes the connection, which
    /// discards the transaction.
    pub async fn run_in_transaction<T, F>(&self, unit: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, AppResult<T>>,
    {
        let deadline = Instant::now() + self.deadline;
        let mut tx = self.within(deadline, WriteTransaction::begin(&self.pool)).await?;

        let outcome = match tx.connection() {
            Ok(conn) => self.within(deadline, unit(conn)).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => match self.within(deadline, tx.commit()).await {
                Ok(()) => Ok(value),
                Err(cause) => Err(tx.rollback_after(cause).await),
            },
            Err(cause) => Err(tx.rollback_after(cause).await),
        }
    }

    async fn within<T>(
        &self,
        deadline: Instant,
        work: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match timeout_at(deadline, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Database operation exceeded {:?}", self.deadline);
                Err(AppError::Timeout)
            }
        }
    }

    /// Fresh migrated in-memory database. A single connection is kept alive
    /// because each in-memory connection is its own database.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        let store = Store::new(pool, Duration::from_secs(5));
        store.migrate().await.unwrap();
        store
    }
}

/// A pooled connection holding an open `BEGIN IMMEDIATE` transaction.
///
/// Dropped while still open, the connection is detached from the pool and
/// closed, and SQLite discards the transaction with it.
struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
    open: bool,
}

impl WriteTransaction {
    async fn begin(pool: &SqlitePool) -> AppResult<Self> {
        let mut tx = WriteTransaction {
            conn: Some(pool.acquire().await?),
            open: true,
        };
        if let Err(e) = tx.execute("BEGIN IMMEDIATE").await {
            tx.open = false;
            return Err(e.into());
        }
        Ok(tx)
    }

    fn connection(&mut self) -> AppResult<&mut SqliteConnection> {
        self.conn
            .as_deref_mut()
            .ok_or(AppError::Persistence(sqlx::Error::PoolClosed))
    }

    async fn execute(&mut self, sql: &'static str) -> Result<(), sqlx::Error> {
        let conn = self.conn.as_deref_mut().ok_or(sqlx::Error::PoolClosed)?;
        sqlx::query(sql).execute(conn).await?;
        Ok(())
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.execute("COMMIT").await?;
        self.open = false;
        Ok(())
    }

    async fn rollback_after(mut self, cause: AppError) -> AppError {
        match self.execute("ROLLBACK").await {
            Ok(()) => {
                self.open = false;
                debug!("Transaction rolled back: {}", cause);
                cause
            }
            Err(rollback) => {
                error!("Rollback failed after {}: {}", cause, rollback);
                AppError::Rollback {
                    cause: Box::new(cause),
                    rollback,
                }
            }
        }
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Some(conn) = self.conn.take() {
            warn!("Closing connection of an abandoned transaction");
            drop(conn.detach());
        }
    }
}
