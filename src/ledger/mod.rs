//! Fractional share ownership.
//!
//! Share accounting lives in an external ledger (the token contract). The
//! rest of the service only sees it through [`ShareLedger`].

pub mod memory;

pub use memory::InMemoryLedger;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::pricing::{share_price_wei, SHARES_PER_PROPERTY};
use crate::domain::PropertyRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("property {0} is not tokenized")]
    NotTokenized(String),

    #[error("property {0} is not active")]
    Inactive(String),

    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: u64 },

    #[error("only {available} shares available, requested {requested}")]
    InsufficientShares { requested: u64, available: u64 },
}

/// Share supply of one tokenized property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSupply {
    pub property_id: String,
    pub total_shares: u64,
    pub shares_sold: u64,
    pub available: u64,
    /// Decimal string so wei amounts survive JSON consumers without 128-bit ints.
    #[serde(with = "wei_string")]
    pub share_price_wei: u128,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub property_id: String,
    pub buyer: String,
    pub quantity: u64,
    #[serde(with = "wei_string")]
    pub total_cost_wei: u128,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub property_id: String,
    pub shares: u64,
    pub total_shares: u64,
}

/// Supply a catalog record would start with once tokenized: every share
/// unsold, sales open. Invalid listings are never offered.
pub fn offering(record: &PropertyRecord) -> Result<ShareSupply, LedgerError> {
    if !record.is_valid() {
        return Err(LedgerError::NotTokenized(record.ad_id.clone()));
    }
    Ok(ShareSupply {
        property_id: record.ad_id.clone(),
        total_shares: SHARES_PER_PROPERTY,
        shares_sold: 0,
        available: SHARES_PER_PROPERTY,
        share_price_wei: share_price_wei(record.price, &record.currency),
        active: true,
    })
}

pub trait ShareLedger: Send + Sync {
    /// Register a catalog record so its shares can be sold. Idempotent.
    fn tokenize(&self, record: &PropertyRecord) -> Result<ShareSupply, LedgerError>;

    /// Open or close sales of a tokenized property. Purchases against a
    /// closed property fail with [`LedgerError::Inactive`].
    fn set_active(&self, property_id: &str, active: bool) -> Result<ShareSupply, LedgerError>;

    fn purchase(
        &self,
        property_id: &str,
        buyer: &str,
        quantity: u64,
    ) -> Result<Purchase, LedgerError>;

    /// `None` until the property has been tokenized.
    fn supply(&self, property_id: &str) -> Option<ShareSupply>;

    fn balance(&self, property_id: &str, owner: &str) -> u64;

    fn holdings(&self, owner: &str) -> Vec<Holding>;
}

mod wei_string {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}
