use std::sync::OnceLock;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder (once per process) and pre-register the
/// ledger counters. Returns a handle whose `render()` produces the scrape
/// payload.
pub fn init_metrics() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("A metrics recorder is already installed; /metrics will be empty");
            }

            // Pre-register counters so they appear even before the first increment.
            counter!("payouts_created_total").absolute(0);
            counter!("payout_conflicts_total").absolute(0);
            counter!("payout_create_failures_total").absolute(0);
            counter!("payout_status_updates_total").absolute(0);
            counter!("payout_lookups_total").absolute(0);

            handle
        })
        .clone()
}

pub fn record_created() {
    counter!("payouts_created_total").increment(1);
}

/// Count a creation refused because of the caller's input; conflicts are
/// also tracked on their own.
pub fn record_rejection(code: &'static str) {
    if code == "PAYOUT_ALREADY_EXISTS" {
        counter!("payout_conflicts_total").increment(1);
    }
    counter!("payout_rejections_total", "code" => code).increment(1);
}

/// Count a creation that failed on the server side (store or rate source).
pub fn record_failure() {
    counter!("payout_create_failures_total").increment(1);
}

pub fn record_status_update() {
    counter!("payout_status_updates_total").increment(1);
}

pub fn record_lookup() {
    counter!("payout_lookups_total").increment(1);
}
