use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{PayoutStore, StoreError, StoreResult};
use crate::models::Payout;

/// Process-local payout store.
///
/// Records live in an `Arc<RwLock<HashMap>>`, so clones share state. Used by
/// the test suite and when the service runs without `DATABASE_URL`.
#[derive(Default, Clone)]
pub struct InMemoryPayoutStore {
    payouts: Arc<RwLock<HashMap<String, Payout>>>,
}

impl InMemoryPayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.payouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payouts.read().await.is_empty()
    }

    /// Overwrite a record as an external settlement process would
    /// (receipts, `paid_at`, terminal status).
    pub async fn put(&self, payout: Payout) {
        self.payouts.write().await.insert(payout.id.clone(), payout);
    }
}

#[async_trait]
impl PayoutStore for InMemoryPayoutStore {
    async fn insert(&self, payout: &Payout) -> StoreResult<()> {
        let mut payouts = self.payouts.write().await;
        match payouts.entry(payout.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(payout.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(payout.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Payout>> {
        let payouts = self.payouts.read().await;
        Ok(payouts.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        approved: bool,
        expires_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Payout>> {
        let mut payouts = self.payouts.write().await;
        Ok(payouts.get_mut(id).map(|payout| {
            payout.approved = approved;
            payout.expires_at = expires_at;
            payout.updated_at = Some(updated_at);
            payout.clone()
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
