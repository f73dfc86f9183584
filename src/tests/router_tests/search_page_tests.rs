use crate::errors::ServerError;
use crate::router::handle;
use crate::search::results::FETCH_FAILED_MESSAGE;
use crate::search::test_support::StubSource;
use crate::tests::utils::{body_string, get, sample_listings, test_app};
use astra::Body;
use http::{Method, Request};
use serde_json::json;

#[test]
fn search_page_renders_listing_cards() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));

    let resp = handle(get("/"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("300 Properties for Sale in Malaysia"));
    assert!(body.contains("Sunway Tower"));
    assert!(body.contains("RM 450,000"));
    assert!(body.contains("RM 500 psf"));
    assert!(body.contains("Aina Realty"));
    assert!(body.contains("Authorized Agent"), "null account falls back");
    assert!(body.contains("Auction"));
    assert!(body.contains("href=\"/?page=2\""), "pagination links to the next page");
    assert!(!body.contains("Filter Properties"), "filter panel stays closed");
}

#[test]
fn url_state_is_sent_to_the_api() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));

    let resp = handle(get("/?section=rent&bedRooms=Studio,2&sort=psfHighToLow&page=3"), &app)
        .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let calls = app.source.calls();
    assert_eq!(calls.len(), 1);
    let (page, sort, body) = &calls[0];
    assert_eq!(*page, 3);
    assert_eq!(sort, "-psf");
    assert_eq!(body, &json!({"section": "rent", "bedRooms": [0, 2]}));

    let html = body_string(resp);
    assert!(html.contains("Properties for Rent"));
    assert!(html.contains("PSF: High to Low"));
    assert!(html.contains("2 beds"));
}

#[test]
fn search_term_is_matched_locally() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));

    let body = body_string(handle(get("/?location=subang&name=subang"), &app).unwrap());

    let (_, _, sent) = &app.source.calls()[0];
    assert!(sent.get("name").is_none());
    assert!(sent.get("location").is_none());

    assert!(body.contains("Sunway Tower"));
    assert!(!body.contains("Green Acres"));
    assert!(body.contains("1 Properties for Sale in Malaysia"));
}

#[test]
fn failed_fetch_shows_banner_and_keeps_filters() {
    let (app, _db) = test_app(StubSource::failing());

    let resp = handle(get("/?minPrice=200000&bedRooms=2"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains(FETCH_FAILED_MESSAGE));
    assert!(body.contains("0 Properties for Sale"));
    assert!(body.contains("Min RM 200000"));
}

#[test]
fn empty_result_message() {
    let (app, _db) = test_app(StubSource::with_listings(json!({"items": []})));
    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("No properties found matching your criteria"));
}

#[test]
fn filter_panel_loads_property_types() {
    let source = StubSource::with_listings(sample_listings())
        .with_types(json!([{"value": "bungalow", "label": "Bungalow"}]));
    let (app, _db) = test_app(source);

    let body = body_string(handle(get("/?edit=filters&categories=residential"), &app).unwrap());

    assert!(body.contains("Filter Properties"));
    assert!(body.contains("Select Property Types"));
    assert!(body.contains("value=\"bungalow\""));
    // only the listing fetch went to /properties-mock
    assert_eq!(app.source.calls().len(), 1);
}

#[test]
fn property_types_follow_the_first_category_in_the_url() {
    let source = StubSource::with_listings(sample_listings())
        .with_types(json!([{"value": "shop-office", "label": "Shop Office"}]));
    let (app, _db) = test_app(source);

    handle(get("/?edit=filters&categories=residential,commercial"), &app).expect("Handler failed");
    assert_eq!(app.source.type_calls(), vec![Some("residential".to_string())]);

    handle(get("/?categories=residential"), &app).expect("Handler failed");
    assert_eq!(app.source.type_calls().len(), 1, "closed panel skips the lookup");
}

#[test]
fn list_view_and_popover_come_from_ui_params() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));

    let body = body_string(handle(get("/?bedRooms=2&view=list&edit=beds-baths"), &app).unwrap());

    assert!(body.contains("class=\"cards list\""));
    assert!(body.contains("id=\"beds-baths-popover\""));
    assert!(!body.contains("id=\"price-popover\""));
    // the hidden query never carries UI keys
    assert!(body.contains("name=\"q\" value=\"bedRooms=2\""));
    assert!(body.contains("name=\"view\" value=\"list\""));
}

#[test]
fn new_visitor_gets_a_cookie() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));
    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Handler failed");
    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("visitor="));
    assert!(cookie.contains("HttpOnly"));

    let returning = handle(get("/"), &app).unwrap();
    assert!(returning.headers().get("Set-Cookie").is_none());
}

#[test]
fn stylesheet_is_served() {
    let (app, _db) = test_app(StubSource::failing());
    let resp = handle(get("/static/main.css"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/css"));
    assert!(body_string(resp).contains(".property-card"));
}

#[test]
fn unknown_routes_are_not_found() {
    let (app, _db) = test_app(StubSource::failing());
    assert!(matches!(handle(get("/nope"), &app), Err(ServerError::NotFound)));
    assert!(matches!(
        handle(get("/saved-searches/abc"), &app),
        Err(ServerError::NotFound)
    ));
}
