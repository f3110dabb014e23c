use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{PayoutStore, StoreError, StoreResult};
use crate::models::{Currency, Destination, Payout, PayoutMethod};

/// Database row for the payouts table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PayoutRow {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub destination: Json<Destination>,
    pub meta: Json<Map<String, Value>>,
    pub status: String,
    pub approved: bool,
    pub amount_fiat: Decimal,
    pub xrate: Decimal,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub callback_url: Option<String>,
    pub receipt: Option<String>,
    pub extra_receipt: Option<String>,
}

impl TryFrom<PayoutRow> for Payout {
    type Error = anyhow::Error;

    fn try_from(row: PayoutRow) -> Result<Self, Self::Error> {
        let currency = Currency::from_api_str(&row.currency)
            .ok_or_else(|| anyhow!("payout {} has unknown currency {:?}", row.id, row.currency))?;
        let method = PayoutMethod::from_api_str(&row.method)
            .ok_or_else(|| anyhow!("payout {} has unknown method {:?}", row.id, row.method))?;

        Ok(Payout {
            id: row.id,
            amount: row.amount,
            currency,
            method,
            destination: row.destination.0,
            meta: row.meta.0,
            status: row.status,
            approved: row.approved,
            amount_fiat: row.amount_fiat,
            xrate: row.xrate,
            created_at: row.created_at,
            expires_at: row.expires_at,
            updated_at: row.updated_at,
            paid_at: row.paid_at,
            callback_url: row.callback_url,
            receipt: row.receipt,
            extra_receipt: row.extra_receipt,
        })
    }
}

/// Postgres-backed payout store. Uniqueness comes from the primary key.
#[derive(Debug, Clone)]
pub struct PgPayoutStore {
    pool: PgPool,
}

impl PgPayoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutStore for PgPayoutStore {
    async fn insert(&self, payout: &Payout) -> StoreResult<()> {
        let inserted: Option<(String,)> = sqlx::query_as(
            r#"
            INSERT INTO payouts (
                id, amount, currency, method, destination, meta, status, approved,
                amount_fiat, xrate, created_at, expires_at, callback_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&payout.id)
        .bind(payout.amount)
        .bind(payout.currency.as_str())
        .bind(payout.method.as_str())
        .bind(Json(&payout.destination))
        .bind(Json(&payout.meta))
        .bind(&payout.status)
        .bind(payout.approved)
        .bind(payout.amount_fiat)
        .bind(payout.xrate)
        .bind(payout.created_at)
        .bind(payout.expires_at)
        .bind(&payout.callback_url)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(_) => Ok(()),
            None => Err(StoreError::Duplicate(payout.id.clone())),
        }
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Payout>> {
        let row = sqlx::query_as::<_, PayoutRow>("SELECT * FROM payouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Payout::try_from).transpose()?)
    }

    async fn update_status(
        &self,
        id: &str,
        approved: bool,
        expires_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Payout>> {
        let row = sqlx::query_as::<_, PayoutRow>(
            r#"
            UPDATE payouts
            SET approved = $2, expires_at = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved)
        .bind(expires_at)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Payout::try_from).transpose()?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
