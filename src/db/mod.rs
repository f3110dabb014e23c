pub mod memory;
pub mod payout_repo;

pub use memory::InMemoryPayoutStore;
pub use payout_repo::PgPayoutStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::Payout;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with this id is already stored; nothing was written.
    #[error("payout {0} already exists")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable payout storage. Every method is a single atomic operation.
#[async_trait]
pub trait PayoutStore: Send + Sync {
    /// Insert a new payout. Fails with [`StoreError::Duplicate`] if the id is
    /// taken, leaving the existing record untouched.
    async fn insert(&self, payout: &Payout) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<Payout>>;

    /// Set `approved`, `expires_at` and `updated_at` on an existing payout and
    /// return the updated record, or `None` if the id is unknown.
    async fn update_status(
        &self,
        id: &str,
        approved: bool,
        expires_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Payout>>;

    /// Connectivity check used by `/health`.
    async fn ping(&self) -> StoreResult<()>;
}

pub async fn init_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
