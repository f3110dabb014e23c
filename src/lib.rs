pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod rates;

use crate::ledger::PayoutLedger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: PayoutLedger,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
