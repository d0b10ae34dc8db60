use crate::router::{handle, respond};
use crate::tests::utils::{ad_ids, body_json, get, init_test_app, post_json};
use http::Method;

#[test]
fn list_defaults_to_first_page_of_valid_listings() {
    let app = init_test_app();

    let resp = handle(get("/properties"), &app.state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let page = body_json(resp);
    assert_eq!(page["total"], 4);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 12);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(ad_ids(&page), vec!["101", "103", "105", "106"]);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let app = init_test_app();

    // 101 matches on district, 105 on description; 104 is invalid.
    let page = body_json(handle(get("/properties?search=ASANBAY"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["101", "105"]);

    let page = body_json(handle(get("/properties?search=cozy%20studio"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["105"]);

    let page = body_json(handle(get("/properties?search=cozy+studio"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["105"]);
}

#[test]
fn exact_filters_and_price_bounds() {
    let app = init_test_app();

    let page = body_json(handle(get("/properties?currency=USD"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["101", "105"]);

    let page = body_json(handle(get("/properties?rooms=3"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["103"]);

    // Bounds compare the raw listed price, whatever the currency.
    let page = body_json(
        handle(get("/properties?minPrice=60000&maxPrice=210000"), &app.state).unwrap(),
    );
    assert_eq!(ad_ids(&page), vec!["105", "106"]);
    assert_eq!(page["total"], 2);

    let page = body_json(
        handle(get("/properties?district=Center&minArea=70"), &app.state).unwrap(),
    );
    assert_eq!(ad_ids(&page), vec!["103"]);
}

#[test]
fn empty_parameters_are_ignored() {
    let app = init_test_app();
    let page = body_json(
        handle(get("/properties?search=&currency=&rooms=&minPrice="), &app.state).unwrap(),
    );
    assert_eq!(page["total"], 4);
}

#[test]
fn pagination_slices_and_keeps_totals() {
    let app = init_test_app();

    let page = body_json(handle(get("/properties?limit=3&page=2"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["106"]);
    assert_eq!(page["total"], 4);
    assert_eq!(page["totalPages"], 2);

    let page = body_json(handle(get("/properties?limit=3&page=5"), &app.state).unwrap());
    assert!(ad_ids(&page).is_empty());
    assert_eq!(page["total"], 4);
    assert_eq!(page["totalPages"], 2);
}

#[test]
fn bad_numbers_are_rejected_with_400() {
    let app = init_test_app();

    for uri in [
        "/properties?limit=0",
        "/properties?page=0",
        "/properties?page=abc",
        "/properties?minPrice=cheap",
    ] {
        let resp = respond(get(uri), &app.state);
        assert_eq!(resp.status(), 400, "{uri}");
        let body = body_json(resp);
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[test]
fn get_by_id_reaches_invalid_listings() {
    let app = init_test_app();

    let resp = handle(get("/properties/102"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);
    let record = body_json(resp);
    assert_eq!(record["ad_id"], "102");
    assert_eq!(record["price"], 0);

    let record = body_json(handle(get("/properties/101"), &app.state).unwrap());
    assert_eq!(record["url"], "https://example.kg/101");
    assert!(record["price"].is_u64());
    assert!(record["area_m2"].is_u64());
    assert_eq!(record["features"], "balcony; parking");

    let resp = respond(get("/properties/999"), &app.state);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["error"], "Property not found");
}

#[test]
fn metadata_describes_valid_listings() {
    let app = init_test_app();

    let meta = body_json(handle(get("/properties/meta"), &app.state).unwrap());
    assert_eq!(meta["totalProperties"], 6);
    assert_eq!(meta["validProperties"], 4);
    assert_eq!(meta["currencies"], serde_json::json!(["EUR", "KGS", "USD"]));
    assert_eq!(meta["roomsOptions"], serde_json::json!(["2", "3", "4"]));
}

#[test]
fn statistics_summarise_in_eth() {
    let app = init_test_app();

    let stats = body_json(handle(get("/properties/stats"), &app.state).unwrap());
    assert_eq!(stats["totalProperties"], 4);
    assert_eq!(stats["byRooms"][0]["name"], "2");
    assert_eq!(stats["byRooms"][0]["value"], 2);

    let districts: Vec<&str> = stats["byDistrict"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(districts, vec!["Asanbay", "Center", "Unknown", "Vostok-5"]);

    let buckets = stats["priceDistribution"].as_array().unwrap();
    assert_eq!(buckets.len(), 5);
    assert_eq!(buckets[4]["name"], "> 5 ETH");
    assert_eq!(buckets[4]["value"], 4);
}

#[test]
fn reload_picks_up_a_changed_catalog() {
    let app = init_test_app();
    assert_eq!(
        body_json(handle(get("/properties"), &app.state).unwrap())["total"],
        4
    );

    app.rewrite_catalog(
        r#"[{"ad_id":"201","title":"New build","price":99000,"currency":"USD","area_m2":70,"rooms":"3"}]"#,
    );
    // Cached until reloaded.
    assert_eq!(
        body_json(handle(get("/properties"), &app.state).unwrap())["total"],
        4
    );

    let reloaded = body_json(handle(post_json("/admin/reload", ""), &app.state).unwrap());
    assert_eq!(reloaded["totalProperties"], 1);

    let page = body_json(handle(get("/properties"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["201"]);
}

#[test]
fn broken_catalog_is_a_generic_500() {
    let app = init_test_app();
    app.rewrite_catalog("{ not json");

    let resp = respond(get("/properties"), &app.state);
    assert_eq!(resp.status(), 500);
    assert_eq!(body_json(resp)["error"], "Internal server error");
}

#[test]
fn oddly_typed_records_still_serve() {
    let app = init_test_app();
    app.rewrite_catalog(
        r#"[
          {"ad_id":"1","title":"Flat","price":50000,"currency":"USD","area_m2":48,"rooms":"2","series":105},
          {"ad_id":"2","title":"House","price":"75000","currency":"USD","area_m2":120,"rooms":4,"floor":"3","views":1.5},
          {"title":"No id","price":1000,"currency":"USD","area_m2":10}
        ]"#,
    );
    let reloaded = body_json(handle(post_json("/admin/reload", ""), &app.state).unwrap());
    assert_eq!(reloaded["totalProperties"], 2);

    let page = body_json(handle(get("/properties"), &app.state).unwrap());
    assert_eq!(ad_ids(&page), vec!["1", "2"]);

    let meta = body_json(handle(get("/properties/meta"), &app.state).unwrap());
    assert_eq!(meta["roomsOptions"], serde_json::json!(["2", "4"]));

    let record = body_json(handle(get("/properties/1"), &app.state).unwrap());
    assert_eq!(record["series"], 105);

    let record = body_json(handle(get("/properties/2"), &app.state).unwrap());
    assert_eq!(record["floor"], "3");
    assert_eq!(record["price"], "75000");
}

#[test]
fn unknown_routes_and_wrong_methods() {
    let app = init_test_app();

    let resp = respond(get("/nowhere"), &app.state);
    assert_eq!(resp.status(), 404);

    let req = http::Request::builder()
        .method(Method::DELETE)
        .uri("/properties")
        .body(astra::Body::empty())
        .unwrap();
    assert_eq!(respond(req, &app.state).status(), 405);

    let resp = handle(get("/health"), &app.state).unwrap();
    assert_eq!(body_json(resp)["status"], "ok");
}
