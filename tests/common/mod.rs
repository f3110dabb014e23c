use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use payout_ledger::api::router::create_router;
use payout_ledger::db::InMemoryPayoutStore;
use payout_ledger::ledger::PayoutLedger;
use payout_ledger::models::Currency;
use payout_ledger::rates::FixedRateProvider;
use payout_ledger::AppState;

/// Router over an in-memory store with rate 7 (EUR overridden to 0.92).
#[allow(dead_code)]
pub fn build_test_app() -> (axum::Router, InMemoryPayoutStore) {
    let store = InMemoryPayoutStore::new();
    let rates = FixedRateProvider::new(Decimal::from(7)).with_rate(Currency::Eur, Decimal::new(92, 2));
    let ledger = PayoutLedger::new(Arc::new(store.clone()), Arc::new(rates));

    let state = AppState {
        ledger,
        metrics_handle: payout_ledger::metrics::init_metrics(),
    };

    (create_router(state), store)
}

/// Send a request and decode the JSON response (Null for empty bodies).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

/// A valid creation body; tweak fields per test.
#[allow(dead_code)]
pub fn payout_body(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "amount": "100.50",
        "currency": "USDT",
        "method": "bank",
        "destination": { "account": "40817810099910004312", "fullname": "Ivan Petrov" },
        "meta": { "partner_ref": "ord-7781", "attempt": 1 },
        "callback_url": "https://partner.example/payout-callback"
    })
}
