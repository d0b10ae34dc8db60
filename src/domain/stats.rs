// src/domain/stats.rs

use crate::domain::pricing::price_to_eth;
use crate::domain::property::PropertyRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const MAX_ROOMS_OPTIONS: usize = 15;
const TOP_ROOM_GROUPS: usize = 8;
const TOP_DISTRICTS: usize = 10;
const UNKNOWN: &str = "Unknown";

/// Upper bounds (exclusive) of the ETH price buckets, with their labels.
const PRICE_RANGES: [(f64, f64, &str); 5] = [
    (0.0, 0.5, "< 0.5 ETH"),
    (0.5, 1.0, "0.5-1 ETH"),
    (1.0, 2.0, "1-2 ETH"),
    (2.0, 5.0, "2-5 ETH"),
    (5.0, f64::INFINITY, "> 5 ETH"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub total_properties: usize,
    pub valid_properties: usize,
    pub currencies: Vec<String>,
    pub rooms_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomGroup {
    pub name: String,
    pub value: usize,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatistics {
    pub total_properties: usize,
    pub total_value: f64,
    pub avg_price: f64,
    pub by_rooms: Vec<RoomGroup>,
    pub by_district: Vec<NamedCount>,
    pub price_distribution: Vec<NamedCount>,
}

/// `total` counts every record; the rest only looks at valid ones.
/// Room labels are sorted lexically before the cut to 15, not by frequency.
pub fn metadata<'a>(
    total: usize,
    valid: impl Iterator<Item = &'a PropertyRecord>,
) -> CatalogMetadata {
    let mut valid_count = 0;
    let mut currencies = BTreeSet::new();
    let mut rooms = BTreeSet::new();

    for record in valid {
        valid_count += 1;
        if !record.currency.is_empty() {
            currencies.insert(record.currency.clone());
        }
        if !record.rooms.is_empty() {
            rooms.insert(record.rooms.clone());
        }
    }

    CatalogMetadata {
        total_properties: total,
        valid_properties: valid_count,
        currencies: currencies.into_iter().collect(),
        rooms_options: rooms.into_iter().take(MAX_ROOMS_OPTIONS).collect(),
    }
}

pub fn statistics<'a>(valid: impl Iterator<Item = &'a PropertyRecord>) -> CatalogStatistics {
    let mut count = 0;
    let mut total_value = 0.0;
    let mut rooms: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut districts: HashMap<&str, usize> = HashMap::new();
    let mut buckets = [0usize; PRICE_RANGES.len()];

    for record in valid {
        let eth = price_to_eth(record.price, &record.currency);
        count += 1;
        total_value += eth;

        let room_key = if record.rooms.is_empty() {
            UNKNOWN
        } else {
            record.rooms.as_str()
        };
        let entry = rooms.entry(room_key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += eth;

        let district = record
            .district
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN);
        *districts.entry(district).or_insert(0) += 1;

        if let Some(slot) = PRICE_RANGES
            .iter()
            .position(|(min, max, _)| eth >= *min && eth < *max)
        {
            buckets[slot] += 1;
        }
    }

    let mut by_rooms: Vec<RoomGroup> = rooms
        .into_iter()
        .map(|(name, (value, sum))| RoomGroup {
            name: name.to_string(),
            value,
            avg_price: sum / value as f64,
        })
        .collect();
    by_rooms.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    by_rooms.truncate(TOP_ROOM_GROUPS);

    let mut by_district: Vec<NamedCount> = districts
        .into_iter()
        .map(|(name, value)| NamedCount {
            name: name.to_string(),
            value,
        })
        .collect();
    by_district.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    by_district.truncate(TOP_DISTRICTS);

    let price_distribution = PRICE_RANGES
        .iter()
        .zip(buckets)
        .map(|((_, _, label), value)| NamedCount {
            name: label.to_string(),
            value,
        })
        .collect();

    CatalogStatistics {
        total_properties: count,
        total_value,
        avg_price: if count == 0 {
            0.0
        } else {
            total_value / count as f64
        },
        by_rooms,
        by_district,
        price_distribution,
    }
}
