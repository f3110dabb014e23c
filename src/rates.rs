use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::Currency;

/// Source of the USDT → fiat conversion rate applied at payout creation.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn rate(&self, currency: Currency) -> anyhow::Result<Decimal>;
}

/// Constant rates: one default for every currency plus optional per-currency
/// overrides.
#[derive(Debug, Clone)]
pub struct FixedRateProvider {
    default_rate: Decimal,
    overrides: HashMap<Currency, Decimal>,
}

impl FixedRateProvider {
    pub fn new(default_rate: Decimal) -> Self {
        Self {
            default_rate,
            overrides: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.overrides.insert(currency, rate);
        self
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    async fn rate(&self, currency: Currency) -> anyhow::Result<Decimal> {
        let rate = self
            .overrides
            .get(&currency)
            .copied()
            .unwrap_or(self.default_rate);

        anyhow::ensure!(rate > Decimal::ZERO, "non-positive rate {rate} for {currency}");
        Ok(rate)
    }
}
