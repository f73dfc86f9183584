use crate::auth::visitor::hash_token;
use crate::db::VisitorStore;
use crate::errors::ServerError;
use crate::router::{handle, App};
use crate::search::saved::{SavedSearch, SAVED_SEARCHES_KEY};
use crate::search::test_support::StubSource;
use crate::search::PersistentStore;
use crate::tests::utils::{
    body_string, get, location, post_form, sample_listings, test_app, VISITOR_COOKIE,
};

fn stored(app: &App<StubSource>) -> Vec<SavedSearch> {
    let token = VISITOR_COOKIE.trim_start_matches("visitor=");
    let raw = VisitorStore::new(&app.db, hash_token(token))
        .read(SAVED_SEARCHES_KEY)
        .expect("kv read")
        .unwrap_or_else(|| "[]".to_string());
    serde_json::from_str(&raw).expect("saved searches json")
}

#[test]
fn save_then_duplicate_notice() {
    let (app, _db) = test_app(StubSource::failing());
    let form = [("q", "section=rent&bedRooms=2&page=4")];

    let resp = handle(post_form("/saved-searches", &form), &app).expect("Handler failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/?bedRooms=2&page=4&section=rent&notice=saved");

    let resp = handle(post_form("/saved-searches", &form), &app).expect("Handler failed");
    assert_eq!(location(&resp), "/?bedRooms=2&page=4&section=rent&notice=duplicate");

    let saved = stored(&app);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "General Search");
    assert_eq!(saved[0].filters, 1);
    assert!(saved[0].query.get("page").is_none(), "page is not part of a saved search");
}

#[test]
fn nothing_to_save_goes_back_quietly() {
    let (app, _db) = test_app(StubSource::failing());
    let resp = handle(post_form("/saved-searches", &[("q", "section=rent")]), &app).unwrap();
    assert_eq!(location(&resp), "/?section=rent");
    assert!(stored(&app).is_empty());
}

#[test]
fn notice_and_drawer_render_on_the_page() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));
    handle(
        post_form("/saved-searches", &[("q", "location=Ipoh&name=Ipoh")]),
        &app,
    )
    .unwrap();

    let body = body_string(handle(get("/?notice=saved&saved=open"), &app).unwrap());
    assert!(body.contains("Searched results are saved"));
    assert!(body.contains("Saved Searches"));
    assert!(body.contains("<strong>Ipoh</strong>"));

    let id = stored(&app)[0].id;
    assert!(body.contains(&format!("href=\"/saved-searches/{id}\"")));
}

#[test]
fn apply_navigates_to_the_stored_query() {
    let (app, _db) = test_app(StubSource::failing());
    handle(
        post_form("/saved-searches", &[("q", "minPrice=300000&sort=newest&page=2")]),
        &app,
    )
    .unwrap();
    let id = stored(&app)[0].id;

    let resp = handle(get(&format!("/saved-searches/{id}")), &app).expect("Handler failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/?minPrice=300000&sort=newest");

    assert!(matches!(
        handle(get("/saved-searches/42"), &app),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn delete_is_idempotent_and_reopens_drawer() {
    let (app, _db) = test_app(StubSource::failing());
    handle(post_form("/saved-searches", &[("q", "tenure=freehold")]), &app).unwrap();
    let id = stored(&app)[0].id;

    let path = format!("/saved-searches/{id}/delete");
    let resp = handle(post_form(&path, &[("q", "section=rent")]), &app).expect("Handler failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/?section=rent&saved=open");
    assert!(stored(&app).is_empty());

    let again = handle(post_form(&path, &[("q", "section=rent")]), &app).expect("Handler failed");
    assert_eq!(again.status(), 303);
}

#[test]
fn saved_searches_belong_to_one_visitor() {
    let (app, _db) = test_app(StubSource::with_listings(sample_listings()));
    handle(post_form("/saved-searches", &[("q", "bedRooms=3")]), &app).unwrap();

    let stranger = http::Request::builder()
        .method(http::Method::GET)
        .uri("/?saved=open")
        .header("Cookie", "visitor=someone-else-0123456789")
        .body(astra::Body::empty())
        .unwrap();
    let body = body_string(handle(stranger, &app).unwrap());
    assert!(body.contains("No saved searches yet."));
}
