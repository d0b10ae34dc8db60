use crate::domain::pricing::SHARES_PER_PROPERTY;
use crate::domain::PropertyRecord;
use crate::ledger::{offering, Holding, LedgerError, Purchase, ShareLedger, ShareSupply};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
struct Tokenized {
    total_shares: u64,
    shares_sold: u64,
    share_price_wei: u128,
    active: bool,
}

#[derive(Debug, Default)]
struct Book {
    properties: HashMap<String, Tokenized>,
    /// owner -> property -> shares, ordered so portfolios list stably.
    balances: HashMap<String, BTreeMap<String, u64>>,
}

/// Process-local stand-in for the on-chain ledger. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: Mutex<Book>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

fn supply_of(property_id: &str, t: &Tokenized) -> ShareSupply {
    ShareSupply {
        property_id: property_id.to_string(),
        total_shares: t.total_shares,
        shares_sold: t.shares_sold,
        available: t.total_shares - t.shares_sold,
        share_price_wei: t.share_price_wei,
        active: t.active,
    }
}

impl ShareLedger for InMemoryLedger {
    fn tokenize(&self, record: &PropertyRecord) -> Result<ShareSupply, LedgerError> {
        let initial = offering(record)?;
        let mut book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = book
            .properties
            .entry(record.ad_id.clone())
            .or_insert_with(|| {
                tracing::debug!(property_id = %record.ad_id, "tokenizing property");
                Tokenized {
                    total_shares: initial.total_shares,
                    shares_sold: initial.shares_sold,
                    share_price_wei: initial.share_price_wei,
                    active: initial.active,
                }
            });
        Ok(supply_of(&record.ad_id, entry))
    }

    fn set_active(&self, property_id: &str, active: bool) -> Result<ShareSupply, LedgerError> {
        let mut book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = book
            .properties
            .get_mut(property_id)
            .ok_or_else(|| LedgerError::NotTokenized(property_id.to_string()))?;
        entry.active = active;
        Ok(supply_of(property_id, entry))
    }

    fn purchase(
        &self,
        property_id: &str,
        buyer: &str,
        quantity: u64,
    ) -> Result<Purchase, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity { quantity });
        }

        let mut book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = book
            .properties
            .get_mut(property_id)
            .ok_or_else(|| LedgerError::NotTokenized(property_id.to_string()))?;

        if !entry.active {
            return Err(LedgerError::Inactive(property_id.to_string()));
        }
        let available = entry.total_shares - entry.shares_sold;
        if quantity > available {
            return Err(LedgerError::InsufficientShares {
                requested: quantity,
                available,
            });
        }

        entry.shares_sold += quantity;
        let total_cost_wei = entry.share_price_wei * quantity as u128;

        *book
            .balances
            .entry(buyer.to_string())
            .or_default()
            .entry(property_id.to_string())
            .or_insert(0) += quantity;

        Ok(Purchase {
            property_id: property_id.to_string(),
            buyer: buyer.to_string(),
            quantity,
            total_cost_wei,
            purchased_at: Utc::now(),
        })
    }

    fn supply(&self, property_id: &str) -> Option<ShareSupply> {
        let book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        book.properties
            .get(property_id)
            .map(|t| supply_of(property_id, t))
    }

    fn balance(&self, property_id: &str, owner: &str) -> u64 {
        let book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        book.balances
            .get(owner)
            .and_then(|held| held.get(property_id))
            .copied()
            .unwrap_or(0)
    }

    fn holdings(&self, owner: &str) -> Vec<Holding> {
        let book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(held) = book.balances.get(owner) else {
            return Vec::new();
        };
        held.iter()
            .filter(|(_, shares)| **shares > 0)
            .map(|(property_id, shares)| Holding {
                property_id: property_id.clone(),
                shares: *shares,
                total_shares: book
                    .properties
                    .get(property_id)
                    .map(|t| t.total_shares)
                    .unwrap_or(SHARES_PER_PROPERTY),
            })
            .collect()
    }
}
