// src/domain/filters.rs

use crate::domain::property::PropertyRecord;
use crate::errors::ServerError;
use std::collections::HashMap;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 12;
pub const MAX_LIMIT: usize = 1000;

/// Listing predicates. `None` means "not applied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub search: Option<String>,
    pub currency: Option<String>,
    pub rooms: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub district: Option<String>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Result<Self, ServerError> {
        if page < 1 {
            return Err(ServerError::BadRequest("page must be at least 1".into()));
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(ServerError::BadRequest(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(Self { page, limit })
    }

    /// Half-open `[start, end)` window into a result set of `total` items.
    pub fn window(&self, total: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit).min(total);
        let end = self.page.saturating_mul(self.limit).min(total);
        (start, end)
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

impl PropertyFilter {
    /// Applies the predicates in listing order: search, currency, rooms,
    /// price bounds, then district and area bounds. Validity is checked
    /// separately by the caller.
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if let Some(term) = &self.search {
            if !record.matches_search(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(currency) = &self.currency {
            if &record.currency != currency {
                return false;
            }
        }
        if let Some(rooms) = &self.rooms {
            if &record.rooms != rooms {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| record.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| record.price > max) {
            return false;
        }
        if let Some(district) = &self.district {
            if record.district.as_deref() != Some(district.as_str()) {
                return false;
            }
        }
        if self.min_area.is_some_and(|min| record.area_m2 < min) {
            return false;
        }
        if self.max_area.is_some_and(|max| record.area_m2 > max) {
            return false;
        }
        true
    }
}

/// Parse the `/properties` query string into a filter and a page request.
/// Empty values count as absent; malformed numbers are rejected.
pub fn parse_list_query(
    params: &HashMap<String, String>,
) -> Result<(PropertyFilter, PageRequest), ServerError> {
    let page = parse_number::<usize>(params, "page")?.unwrap_or(DEFAULT_PAGE);
    let limit = parse_number::<usize>(params, "limit")?.unwrap_or(DEFAULT_LIMIT);

    let filter = PropertyFilter {
        search: text(params, "search"),
        currency: text(params, "currency"),
        rooms: text(params, "rooms"),
        min_price: parse_bound(params, "minPrice")?,
        max_price: parse_bound(params, "maxPrice")?,
        district: text(params, "district"),
        min_area: parse_bound(params, "minArea")?,
        max_area: parse_bound(params, "maxArea")?,
    };

    Ok((filter, PageRequest::new(page, limit)?))
}

fn text(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_bound(params: &HashMap<String, String>, key: &str) -> Result<Option<f64>, ServerError> {
    match parse_number::<f64>(params, key)? {
        Some(v) if !v.is_finite() => Err(ServerError::BadRequest(format!("{key} must be finite"))),
        other => Ok(other),
    }
}

fn parse_number<T: std::str::FromStr>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ServerError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("{key} must be a number, got {raw:?}"))),
    }
}
