use std::sync::Arc;

use chrono::Duration;

use payout_ledger::api::router::create_router;
use payout_ledger::config::{AppConfig, LogFormat};
use payout_ledger::db::{self, InMemoryPayoutStore, PayoutStore, PgPayoutStore};
use payout_ledger::ledger::PayoutLedger;
use payout_ledger::metrics::init_metrics;
use payout_ledger::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    let addr = format!("{}:{}", config.host, config.port);

    let store: Arc<dyn PayoutStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::init_pool(url, config.database_max_connections).await?;
            tracing::info!("Database connected, migrations applied");
            Arc::new(PgPayoutStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, payouts are kept in memory and lost on restart");
            Arc::new(InMemoryPayoutStore::new())
        }
    };

    let rates = config.rate_provider();
    tracing::info!(
        xrate = %config.xrate,
        overrides = config.xrate_overrides.len(),
        creation_ttl_minutes = config.creation_ttl_minutes,
        "Rate provider configured"
    );

    let ledger = PayoutLedger::new(store, Arc::new(rates))
        .with_creation_ttl(Duration::minutes(config.creation_ttl_minutes));

    let state = AppState {
        ledger,
        metrics_handle: init_metrics(),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}
