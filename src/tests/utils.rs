use crate::db::connection::{init_db, Database};
use crate::router::App;
use crate::search::test_support::StubSource;
use astra::{Body, Response};
use http::{Method, Request};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

/// Cookie of a returning visitor, so saved searches survive across requests.
pub const VISITOR_COOKIE: &str = "visitor=test-visitor-0123456789abcdef";

/// Removes the database file when the test ends.
pub struct TempDb {
    path: PathBuf,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Fresh on-disk database with the production schema, one file per test.
pub fn init_test_db() -> (Database, TempDb) {
    let path = std::env::temp_dir().join(format!(
        "listing_search_test_{}.sqlite3",
        rand::random::<u64>()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (db, TempDb { path })
}

pub fn test_app(source: StubSource) -> (App<StubSource>, TempDb) {
    let (db, guard) = init_test_db();
    (App::new(db, source), guard)
}

/// Three listings, thirty pages' worth according to `_meta`.
pub fn sample_listings() -> Value {
    json!({
        "items": [
            {
                "id": "p1", "name": "Sunway Tower", "city": "Subang Jaya", "state": "Selangor",
                "price": 450000, "type": "condominium", "bedRooms": 3, "bathRooms": 2,
                "floorSize": "900", "account": {"name": "Aina Realty", "verified": true}
            },
            {
                "id": "p2", "name": "Green Acres", "city": "Ipoh", "state": "Perak",
                "price": 300000, "type": "semi-detached-house", "isAuction": true
            },
            {
                "id": "p3", "name": "Kiara Villa", "city": "Kuala Lumpur",
                "price": 1200000, "type": "bungalow", "account": null
            }
        ],
        "_meta": {"totalCount": 300, "pageCount": 30, "currentPage": 1, "perPage": 10}
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Cookie", VISITOR_COOKIE)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Cookie", VISITOR_COOKIE)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
