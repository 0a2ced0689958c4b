//! Conversions between raw smallest-unit integers, whole token amounts, USD
//! values and efficiency ratios. Pure functions, no I/O.

use crate::error::NumericError;
use crate::models::QuoteRequest;

fn scale(decimals: u8) -> f64 {
    10_f64.powi(decimals as i32)
}

/// `raw / 10^decimals`.
pub fn to_whole_units(raw_amount: u128, decimals: u8) -> f64 {
    raw_amount as f64 / scale(decimals)
}

/// Inverse of [`to_whole_units`], rounded to the nearest smallest unit.
/// Amounts whose raw form does not fit a `u128` are rejected.
pub fn to_raw_units(whole_amount: f64, decimals: u8) -> Result<u128, NumericError> {
    if !whole_amount.is_finite() {
        return Err(NumericError::NonFinite);
    }
    if whole_amount < 0.0 {
        return Err(NumericError::InvalidAmount(whole_amount.to_string()));
    }
    let raw = (whole_amount * scale(decimals)).round();
    if !raw.is_finite() || raw >= u128::MAX as f64 {
        return Err(NumericError::InvalidAmount(whole_amount.to_string()));
    }
    Ok(raw as u128)
}

pub fn to_usd(whole_amount: f64, unit_price_usd: f64) -> f64 {
    whole_amount * unit_price_usd
}

/// Fraction of USD value retained: `dest_usd / source_usd`.
pub fn efficiency_ratio(dest_usd: f64, source_usd: f64) -> Result<f64, NumericError> {
    if source_usd == 0.0 {
        return Err(NumericError::DivisionByZero);
    }
    let ratio = dest_usd / source_usd;
    if !ratio.is_finite() {
        return Err(NumericError::NonFinite);
    }
    Ok(ratio)
}

/// Efficiency from a provider-reported price impact, e.g. `-0.25` (percent)
/// becomes `0.9975`. Not interchangeable with the USD path.
pub fn efficiency_from_impact_percent(impact_percent: f64) -> Result<f64, NumericError> {
    let ratio = 1.0 + impact_percent / 100.0;
    if !ratio.is_finite() {
        return Err(NumericError::NonFinite);
    }
    Ok(ratio)
}

/// USD-path efficiency for a destination amount quoted against `request`,
/// priced with the resolver's unit prices.
pub fn usd_efficiency(
    request: &QuoteRequest,
    source_raw: u128,
    destination_whole: f64,
) -> Result<f64, NumericError> {
    let source_usd = to_usd(
        to_whole_units(source_raw, request.origin_token.decimals),
        request.origin_token.usd_unit_price,
    );
    let dest_usd = to_usd(destination_whole, request.destination_token.usd_unit_price);
    efficiency_ratio(dest_usd, source_usd)
}

/// Parse an integer amount that providers send as a decimal string.
pub fn parse_raw_amount(value: &str) -> Result<u128, NumericError> {
    value
        .trim()
        .parse::<u128>()
        .map_err(|_| NumericError::InvalidAmount(value.to_string()))
}

/// Optional raw amount string (e.g. a provider's slippage floor) in whole units.
pub fn parse_optional_whole(value: Option<&str>, decimals: u8) -> Result<Option<f64>, NumericError> {
    value
        .map(|raw| parse_raw_amount(raw).map(|raw| to_whole_units(raw, decimals)))
        .transpose()
}

/// `0.998712` -> `"99.8712%"`.
pub fn format_efficiency(ratio: f64) -> String {
    format!("{:.4}%", ratio * 100.0)
}
