use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Currency, PayoutMethod};

/// Recipient details. `account` is whatever identifies the target for the
/// chosen method (IBAN, wallet address, PayPal email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub account: String,
    #[serde(default)]
    pub fullname: Option<String>,
}

/// A stored payout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub method: PayoutMethod,
    pub destination: Destination,
    pub meta: Map<String, Value>,
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

/// Payout status constants. Only `PROCESSING` is written by this service;
/// the rest are set by settlement processes sharing the table.
pub mod payout_status {
    pub const PROCESSING: &str = "processing";
    pub const PAID: &str = "paid";
    pub const EXPIRED: &str = "expired";
    pub const FAILED: &str = "failed";
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /payouts`. Currency and method stay raw strings so that
/// unknown values surface as `INVALID_CURRENCY` / `INVALID_METHOD` instead of
/// a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayoutRequest {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub destination: Destination,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutCreated {
    pub xrate: Decimal,
    pub amount_fiat: Decimal,
}

/// Body of `POST /update-payout-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub id: String,
    pub approved: bool,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub id: String,
    pub approved: bool,
    pub expires_at: DateTime<Utc>,
}
