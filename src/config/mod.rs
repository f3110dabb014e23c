use rust_decimal::Decimal;
use std::collections::HashMap;
use std::env;

use crate::ledger::validation::MAX_TTL_MINUTES;
use crate::ledger::DEFAULT_CREATION_TTL_MINUTES;
use crate::models::Currency;
use crate::rates::FixedRateProvider;

const DEFAULT_XRATE: i64 = 7;

/// Output format of the `tracing` fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL. When unset the service keeps payouts in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,

    // Rates
    pub xrate: Decimal,
    pub xrate_overrides: HashMap<Currency, Decimal>,

    /// Minutes until a newly created payout expires.
    pub creation_ttl_minutes: i64,

    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            host: "0.0.0.0".into(),
            port: 8080,
            xrate: Decimal::from(DEFAULT_XRATE),
            xrate_overrides: HashMap::new(),
            creation_ttl_minutes: DEFAULT_CREATION_TTL_MINUTES,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let xrate = match lookup("PAYOUT_XRATE") {
            Some(raw) => parse_rate("PAYOUT_XRATE", &raw)?,
            None => defaults.xrate,
        };

        let mut xrate_overrides = HashMap::new();
        for currency in Currency::ALL {
            let key = format!("PAYOUT_XRATE_{}", currency.as_str());
            if let Some(raw) = lookup(&key) {
                xrate_overrides.insert(currency, parse_rate(&key, &raw)?);
            }
        }

        let creation_ttl_minutes: i64 = match lookup("PAYOUT_CREATION_TTL_MINUTES") {
            Some(raw) => raw.trim().parse()?,
            None => defaults.creation_ttl_minutes,
        };
        anyhow::ensure!(
            (1..=MAX_TTL_MINUTES).contains(&creation_ttl_minutes),
            "PAYOUT_CREATION_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {creation_ttl_minutes}"
        );

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw)
                .ok_or_else(|| anyhow::anyhow!("LOG_FORMAT must be \"text\" or \"json\", got {raw:?}"))?,
            None => defaults.log_format,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            database_max_connections: match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => raw.trim().parse()?,
                None => defaults.database_max_connections,
            },
            host: lookup("HOST").unwrap_or(defaults.host),
            port: match lookup("PORT") {
                Some(raw) => raw.trim().parse()?,
                None => defaults.port,
            },
            xrate,
            xrate_overrides,
            creation_ttl_minutes,
            log_format,
        })
    }

    pub fn rate_provider(&self) -> FixedRateProvider {
        self.xrate_overrides
            .iter()
            .fold(FixedRateProvider::new(self.xrate), |provider, (currency, rate)| {
                provider.with_rate(*currency, *rate)
            })
    }
}

fn parse_rate(key: &str, raw: &str) -> anyhow::Result<Decimal> {
    let rate: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{key} is not a decimal ({raw:?}): {e}"))?;
    anyhow::ensure!(rate > Decimal::ZERO, "{key} must be positive, got {rate}");
    Ok(rate)
}
