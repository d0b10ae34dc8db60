use crate::app::AppState;
use crate::catalog::{CatalogService, JsonFileSource};
use crate::chat::ChatProvider;
use crate::ledger::InMemoryLedger;
use astra::{Body, Request, Response};
use http::Method;
use serde_json::Value;
use std::io::{Read, Write};
use tempfile::NamedTempFile;

/// Six listings: 102 has no price and 104 has no area, the rest are valid.
pub const FIXTURE_CATALOG: &str = r#"[
  {
    "ad_id": "101", "title": "Sunny 2-room flat", "price": 50000, "currency": "USD",
    "area_m2": 48, "rooms": "2", "district": "Asanbay", "description": "Renovated, near the lake",
    "series": "105", "floor": 3, "floors_total": 9, "features": "balcony; parking",
    "documents": "red book", "seller_name": "Aida", "offer_type": "owner", "views": 120, "favorites": 4,
    "url": "https://example.kg/101"
  },
  {
    "ad_id": "102", "title": "Price on request", "price": 0, "currency": "USD",
    "area_m2": 60, "rooms": "3", "district": "Center", "description": "Call for details"
  },
  {
    "ad_id": "103", "title": "Family apartment", "price": 9350000, "currency": "KGS",
    "area_m2": 75, "rooms": "3", "district": "Center", "description": "Quiet courtyard"
  },
  {
    "ad_id": "104", "title": "Land plot", "price": 120000, "currency": "USD",
    "area_m2": 0, "rooms": "", "district": null, "description": "Asanbay outskirts"
  },
  {
    "ad_id": "105", "title": "Cozy studio", "price": 85000, "currency": "USD",
    "area_m2": 64, "rooms": "2", "district": null, "description": "Close to Asanbay park"
  },
  {
    "ad_id": "106", "title": "Penthouse", "price": 210000, "currency": "EUR",
    "area_m2": 90, "rooms": "4", "district": "Vostok-5", "description": "Top floor"
  }
]"#;

/// Application state over a temp catalog file. The file lives as long as
/// this value does.
pub struct TestApp {
    pub state: AppState,
    pub catalog_file: NamedTempFile,
}

impl TestApp {
    pub fn rewrite_catalog(&self, contents: &str) {
        std::fs::write(self.catalog_file.path(), contents)
            .unwrap_or_else(|e| panic!("rewriting fixture catalog failed: {e}"));
    }
}

pub fn init_test_app() -> TestApp {
    init_test_app_with_chat(None)
}

pub fn init_test_app_with_chat(chat: Option<Box<dyn ChatProvider>>) -> TestApp {
    let mut catalog_file = NamedTempFile::new().expect("create temp catalog");
    catalog_file
        .write_all(FIXTURE_CATALOG.as_bytes())
        .expect("write temp catalog");

    let catalog = CatalogService::new(JsonFileSource::new(catalog_file.path()));
    let state = AppState::new(catalog, InMemoryLedger::new(), chat);

    TestApp {
        state,
        catalog_file,
    }
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn body_json(resp: Response) -> Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("body is not JSON ({e}): {body}"))
}

pub fn ad_ids(page: &Value) -> Vec<String> {
    page["properties"]
        .as_array()
        .expect("properties array")
        .iter()
        .map(|p| p["ad_id"].as_str().unwrap().to_string())
        .collect()
}
