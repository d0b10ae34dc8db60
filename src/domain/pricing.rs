// src/domain/pricing.rs

//! Listing prices expressed in ETH, the way the marketplace quotes them.
//! The rates are fixed display rates, not market data.

pub const KGS_PER_USD: f64 = 85.0;
pub const USD_PER_ETH: f64 = 2500.0;
pub const WEI_PER_ETH: f64 = 1e18;

/// Every tokenized property is split into this many shares.
pub const SHARES_PER_PROPERTY: u64 = 100;

pub fn price_to_usd(price: f64, currency: &str) -> f64 {
    match currency {
        "KGS" => price / KGS_PER_USD,
        // Anything else is already quoted in dollars.
        _ => price,
    }
}

pub fn price_to_eth(price: f64, currency: &str) -> f64 {
    price_to_usd(price, currency) / USD_PER_ETH
}

pub fn price_to_wei(price: f64, currency: &str) -> u128 {
    let wei = (price_to_eth(price, currency) * WEI_PER_ETH).floor();
    if wei.is_finite() && wei > 0.0 {
        wei as u128
    } else {
        0
    }
}

pub fn share_price_wei(price: f64, currency: &str) -> u128 {
    price_to_wei(price, currency) / SHARES_PER_PROPERTY as u128
}

pub fn format_eth(price: f64, currency: &str) -> String {
    format!("{:.4} ETH", price_to_eth(price, currency))
}

pub fn format_eth_with_fiat(price: f64, currency: &str) -> String {
    let fiat = if currency == "USD" {
        format!("${price}")
    } else {
        format!("{price} {currency}")
    };
    format!("{} ({fiat})", format_eth(price, currency))
}
