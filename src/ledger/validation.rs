use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::AppError;
use crate::models::{Currency, PayoutMethod};

/// Matches the width of the `payouts.id` column.
pub const MAX_ID_LEN: usize = 64;
pub const MAX_CALLBACK_URL_LEN: usize = 1024;

/// Smallest payable unit: one cent.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// Largest value a `NUMERIC(12, 2)` column holds: 9_999_999_999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);
pub const AMOUNT_SCALE: u32 = 2;
/// Largest value the `payouts.amount_fiat` `NUMERIC(20, 2)` column holds.
pub const MAX_FIAT_AMOUNT: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

pub const MIN_TTL_MINUTES: i64 = 1;
/// 30 days.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 30;

pub fn validate_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::InvalidId { reason: "id must not be empty" });
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err(AppError::InvalidId { reason: "id must be at most 64 characters" });
    }
    Ok(())
}

pub fn parse_method(raw: &str) -> Result<PayoutMethod, AppError> {
    PayoutMethod::from_api_str(raw).ok_or_else(|| AppError::InvalidMethod {
        method: raw.to_string(),
    })
}

pub fn parse_currency(raw: &str) -> Result<Currency, AppError> {
    Currency::from_api_str(raw).ok_or_else(|| AppError::InvalidCurrency {
        currency: raw.to_string(),
    })
}

/// Check bounds and precision, returning the amount at scale 2.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, AppError> {
    if amount < MIN_AMOUNT {
        return Err(AppError::InvalidAmount { reason: "amount must be at least 0.01" });
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::InvalidAmount { reason: "amount exceeds 9999999999.99" });
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(AppError::InvalidAmount { reason: "amount has more than two decimal places" });
    }

    let mut amount = amount;
    amount.rescale(AMOUNT_SCALE);
    Ok(amount)
}

pub fn validate_callback_url(url: Option<&str>) -> Result<(), AppError> {
    match url {
        Some(u) if u.chars().count() > MAX_CALLBACK_URL_LEN => Err(AppError::InvalidCallbackUrl {
            max: MAX_CALLBACK_URL_LEN,
        }),
        _ => Ok(()),
    }
}

pub fn validate_ttl(ttl_minutes: i64) -> Result<(), AppError> {
    if !(MIN_TTL_MINUTES..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
        return Err(AppError::InvalidTtl {
            ttl_minutes,
            min: MIN_TTL_MINUTES,
            max: MAX_TTL_MINUTES,
        });
    }
    Ok(())
}

/// `rate * amount`, half-away-from-zero to cents, always at scale 2.
pub fn fiat_amount(rate: Decimal, amount: Decimal) -> Result<Decimal, AppError> {
    let raw = rate
        .checked_mul(amount)
        .ok_or(AppError::InvalidAmount { reason: "converted amount out of range" })?;

    let mut fiat = raw.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if fiat > MAX_FIAT_AMOUNT {
        return Err(AppError::InvalidAmount { reason: "converted amount out of range" });
    }
    fiat.rescale(AMOUNT_SCALE);
    Ok(fiat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_constants() {
        assert_eq!(MIN_AMOUNT, dec!(0.01));
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
        assert_eq!(MAX_FIAT_AMOUNT, dec!(999999999999999999.99));
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(matches!(validate_amount(dec!(0.009)), Err(AppError::InvalidAmount { .. })));
        assert!(matches!(validate_amount(Decimal::ZERO), Err(AppError::InvalidAmount { .. })));
        assert!(matches!(validate_amount(dec!(-5)), Err(AppError::InvalidAmount { .. })));
        assert!(validate_amount(dec!(9999999999.99)).is_ok());
        assert!(matches!(validate_amount(dec!(10000000000)), Err(AppError::InvalidAmount { .. })));
    }

    #[test]
    fn test_amount_precision() {
        assert!(matches!(validate_amount(dec!(1.005)), Err(AppError::InvalidAmount { .. })));
        // Trailing zeros beyond two places are not extra precision.
        assert_eq!(validate_amount(dec!(1.5000)).unwrap().to_string(), "1.50");
        assert_eq!(validate_amount(dec!(100)).unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_fiat_amount_example() {
        assert_eq!(fiat_amount(dec!(7), dec!(100.50)).unwrap().to_string(), "703.50");
    }

    #[test]
    fn test_fiat_amount_rounds_half_away_from_zero() {
        assert_eq!(fiat_amount(dec!(0.5), dec!(0.05)).unwrap(), dec!(0.03));
        assert_eq!(fiat_amount(dec!(0.925), dec!(10.01)).unwrap(), dec!(9.26));
        assert_eq!(fiat_amount(dec!(0.921), dec!(10.01)).unwrap(), dec!(9.22));
    }

    #[test]
    fn test_fiat_amount_bounded_by_column_width() {
        // Within Decimal range but wider than NUMERIC(20, 2).
        let err = fiat_amount(dec!(1000000000), MAX_AMOUNT).unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount { .. }));

        assert_eq!(
            fiat_amount(dec!(100000000), dec!(9999999999.99)).unwrap(),
            dec!(999999999999000000.00)
        );
    }

    #[test]
    fn test_ttl_range() {
        assert!(validate_ttl(1).is_ok());
        assert!(validate_ttl(MAX_TTL_MINUTES).is_ok());
        assert!(matches!(validate_ttl(0), Err(AppError::InvalidTtl { .. })));
        assert!(matches!(validate_ttl(-30), Err(AppError::InvalidTtl { .. })));
        assert!(matches!(validate_ttl(MAX_TTL_MINUTES + 1), Err(AppError::InvalidTtl { .. })));
    }

    #[test]
    fn test_id_rules() {
        assert!(validate_id("p1").is_ok());
        assert!(validate_id(&"x".repeat(64)).is_ok());
        assert!(matches!(validate_id(""), Err(AppError::InvalidId { .. })));
        assert!(matches!(validate_id("   "), Err(AppError::InvalidId { .. })));
        assert!(matches!(validate_id(&"x".repeat(65)), Err(AppError::InvalidId { .. })));
    }

    #[test]
    fn test_callback_url_length() {
        assert!(validate_callback_url(None).is_ok());
        assert!(validate_callback_url(Some("https://partner.example/cb")).is_ok());
        let long = format!("https://{}", "a".repeat(1024));
        assert!(matches!(
            validate_callback_url(Some(&long)),
            Err(AppError::InvalidCallbackUrl { .. })
        ));
    }
}
