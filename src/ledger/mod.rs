pub mod validation;

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde_json::Map;

use crate::db::PayoutStore;
use crate::errors::AppError;
use crate::metrics as ledger_metrics;
use crate::models::{
    payout_status, CreatePayoutRequest, Payout, PayoutCreated, StatusUpdateRequest, StatusUpdated,
};
use crate::rates::RateProvider;

/// Expiry window applied to freshly created payouts.
pub const DEFAULT_CREATION_TTL_MINUTES: i64 = 5;

/// The three payout operations over an injected store and rate provider.
#[derive(Clone)]
pub struct PayoutLedger {
    store: Arc<dyn PayoutStore>,
    rates: Arc<dyn RateProvider>,
    creation_ttl: Duration,
}

impl PayoutLedger {
    pub fn new(store: Arc<dyn PayoutStore>, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            store,
            rates,
            creation_ttl: Duration::minutes(DEFAULT_CREATION_TTL_MINUTES),
        }
    }

    pub fn with_creation_ttl(mut self, ttl: Duration) -> Self {
        self.creation_ttl = ttl;
        self
    }

    pub fn store(&self) -> &Arc<dyn PayoutStore> {
        &self.store
    }

    /// Validate and persist a new payout, snapshotting the current rate.
    pub async fn create_payout(&self, req: CreatePayoutRequest) -> Result<PayoutCreated, AppError> {
        let result = self.try_create(req).await;
        match &result {
            Ok(_) => ledger_metrics::record_created(),
            Err(e) if e.is_client_error() => ledger_metrics::record_rejection(e.code()),
            Err(_) => ledger_metrics::record_failure(),
        }
        result
    }

    async fn try_create(&self, req: CreatePayoutRequest) -> Result<PayoutCreated, AppError> {
        validation::validate_id(&req.id)?;

        // Early conflict check so a duplicate id is reported before any
        // input error. The insert below is what actually guarantees uniqueness.
        if self.store.get(&req.id).await?.is_some() {
            return Err(AppError::AlreadyExists { id: req.id });
        }

        let method = validation::parse_method(&req.method)?;
        let currency = validation::parse_currency(&req.currency)?;
        let amount = validation::validate_amount(req.amount)?;
        validation::validate_callback_url(req.callback_url.as_deref())?;

        let xrate = self.rates.rate(currency).await?;
        let amount_fiat = validation::fiat_amount(xrate, amount)?;

        let now = now();
        let expires_at = now
            .checked_add_signed(self.creation_ttl)
            .ok_or_else(|| anyhow::anyhow!("creation TTL {} overflows the expiry timestamp", self.creation_ttl))?;
        let payout = Payout {
            id: req.id,
            amount,
            currency,
            method,
            destination: req.destination,
            meta: req.meta.unwrap_or_else(Map::new),
            status: payout_status::PROCESSING.to_string(),
            approved: false,
            amount_fiat,
            xrate,
            created_at: now,
            expires_at,
            updated_at: None,
            paid_at: None,
            callback_url: req.callback_url,
            receipt: None,
            extra_receipt: None,
        };

        self.store.insert(&payout).await?;

        tracing::info!(
            id = %payout.id,
            amount = %payout.amount,
            currency = %payout.currency,
            method = %payout.method,
            xrate = %xrate,
            amount_fiat = %amount_fiat,
            "Payout created"
        );

        Ok(PayoutCreated { xrate, amount_fiat })
    }

    /// Set the approval flag and refresh the expiry of an existing payout.
    pub async fn update_status(&self, req: StatusUpdateRequest) -> Result<StatusUpdated, AppError> {
        validation::validate_ttl(req.ttl_minutes)?;

        let now = now();
        let expires_at = now + Duration::minutes(req.ttl_minutes);

        let payout = self
            .store
            .update_status(&req.id, req.approved, expires_at, now)
            .await?
            .ok_or_else(|| AppError::NotFound { id: req.id.clone() })?;

        ledger_metrics::record_status_update();
        tracing::info!(
            id = %payout.id,
            approved = payout.approved,
            expires_at = %payout.expires_at,
            "Payout status updated"
        );

        Ok(StatusUpdated {
            id: payout.id,
            approved: payout.approved,
            expires_at: payout.expires_at,
        })
    }

    pub async fn get_payout(&self, id: &str) -> Result<Payout, AppError> {
        ledger_metrics::record_lookup();
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })
    }
}

/// Current time at the precision Postgres stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
