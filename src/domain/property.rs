// src/domain/property.rs

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no string ad_id")]
    MissingId,
}

/// A single listing as it appears in the catalog file.
///
/// Only the fields the service filters, prices or searches on are read out.
/// The source object itself is kept as-is and is what gets serialized, so a
/// record goes back out exactly the way it came in, odd field types included.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub ad_id: String,
    pub price: f64,
    pub currency: String,
    pub area_m2: f64,
    /// A label such as "2" or "3-комн.", never parsed for filtering.
    pub rooms: String,
    pub title: String,
    pub description: String,
    pub district: Option<String>,
    raw: Map<String, Value>,
}

impl PropertyRecord {
    /// Reads one catalog entry. Only a missing or non-string `ad_id` rejects
    /// the record; other fields fall back to empty values when absent, null
    /// or of an unexpected type.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let Value::Object(raw) = value else {
            return Err(RecordError::NotAnObject);
        };
        let ad_id = match raw.get("ad_id") {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(RecordError::MissingId),
        };

        Ok(Self {
            ad_id,
            price: number(raw.get("price")),
            currency: text(raw.get("currency")).unwrap_or_default(),
            area_m2: number(raw.get("area_m2")),
            rooms: text(raw.get("rooms")).unwrap_or_default(),
            title: text(raw.get("title")).unwrap_or_default(),
            description: text(raw.get("description")).unwrap_or_default(),
            district: text(raw.get("district")),
            raw,
        })
    }

    /// Only listings with a real price and a real area show up in search,
    /// metadata and statistics.
    pub fn is_valid(&self) -> bool {
        self.price > 0.0 && self.area_m2 > 0.0
    }

    /// Case-insensitive substring match on title, district or description.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .district
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self.description.to_lowercase().contains(needle)
    }
}

impl Serialize for PropertyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

// Scraped prices and areas are sometimes quoted strings.
fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn sample(ad_id: &str, price: f64, area_m2: f64, currency: &str, rooms: &str) -> PropertyRecord {
    let value = serde_json::json!({
        "ad_id": ad_id,
        "price": price,
        "currency": currency,
        "area_m2": area_m2,
        "rooms": rooms,
        "title": format!("Listing {ad_id}"),
        "description": "",
        "district": null,
    });
    PropertyRecord::from_value(value).unwrap()
}
