use crate::errors::ServerError;
use crate::router::handle;
use crate::search::test_support::StubSource;
use crate::tests::utils::{location, post_form, test_app};

fn redirect_for(path: &str, form: &[(&str, &str)]) -> String {
    let (app, _db) = test_app(StubSource::failing());
    let resp = handle(post_form(path, form), &app).expect("Handler failed");
    assert_eq!(resp.status(), 303, "{path} should answer See Other");
    // actions never call the listings API themselves
    assert!(app.source.calls().is_empty());
    location(&resp)
}

#[test]
fn section_toggle_resets_page() {
    let loc = redirect_for(
        "/section",
        &[("q", "page=3&sort=newest&bedRooms=2"), ("section", "rent")],
    );
    assert_eq!(loc, "/?bedRooms=2&page=1&section=rent&sort=newest");
}

#[test]
fn sort_change_resets_page_and_keeps_view() {
    let loc = redirect_for(
        "/sort",
        &[("q", "page=4&section=rent"), ("sort", "priceLowToHigh"), ("view", "list")],
    );
    assert_eq!(loc, "/?page=1&section=rent&sort=priceLowToHigh&view=list");
}

#[test]
fn price_accepts_separators_and_drops_garbage() {
    let loc = redirect_for(
        "/filters/price",
        &[
            ("q", "page=2&maxPrice=900000"),
            ("minPrice", "RM 200,000"),
            ("maxPrice", "abc"),
        ],
    );
    assert_eq!(loc, "/?minPrice=200000&page=1");
}

#[test]
fn price_clear_leaves_other_facets() {
    let loc = redirect_for(
        "/filters/price/clear",
        &[("q", "minPrice=1&maxPrice=2&tenure=freehold&page=9")],
    );
    assert_eq!(loc, "/?page=1&tenure=freehold");
}

#[test]
fn beds_baths_apply_and_clear() {
    let loc = redirect_for(
        "/filters/beds-baths",
        &[
            ("q", "section=rent&page=6"),
            ("bedRooms", "0"),
            ("bedRooms", "2"),
            ("bathRooms", "1"),
        ],
    );
    assert_eq!(loc, "/?bathRooms=1&bedRooms=0%2C2&page=1&section=rent");

    let loc = redirect_for(
        "/filters/beds-baths/clear",
        &[("q", "bedRooms=2&bathRooms=1&minPrice=5&page=3")],
    );
    assert_eq!(loc, "/?minPrice=5&page=1");
}

#[test]
fn search_sets_location_and_name() {
    let loc = redirect_for("/search", &[("q", "page=5&section=rent"), ("term", "  Subang ")]);
    assert_eq!(loc, "/?location=Subang&name=Subang&page=1&section=rent");

    let loc = redirect_for("/search/clear", &[("q", "location=Subang&name=Subang&page=5")]);
    assert_eq!(loc, "/?page=1");
}

#[test]
fn blank_search_removes_the_term() {
    let loc = redirect_for("/search", &[("q", "location=KL&name=KL"), ("term", "   ")]);
    assert_eq!(loc, "/?page=1");
}

#[test]
fn filter_panel_rebuilds_the_query() {
    let q = "sort=newest&location=KL&name=KL&section=rent&bedRooms=3&page=7";

    let loc = redirect_for(
        "/filters",
        &[
            ("q", q),
            ("categories", "residential"),
            ("tenure", "freehold"),
            ("isAuction", "true"),
        ],
    );
    assert_eq!(
        loc,
        "/?categories=residential&isAuction=true&location=KL&name=KL&page=1&section=rent&sort=newest&tenure=freehold"
    );

    let loc = redirect_for("/filters/clear", &[("q", q)]);
    assert_eq!(loc, "/?location=KL&name=KL&page=1&section=rent&sort=newest");
}

#[test]
fn bad_choices_are_rejected() {
    let (app, _db) = test_app(StubSource::failing());
    let resp = handle(post_form("/section", &[("section", "lease")]), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));

    let resp = handle(post_form("/sort", &[("sort", "cheapest")]), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

#[test]
fn missing_query_field_starts_from_scratch() {
    let loc = redirect_for("/section", &[("section", "rent")]);
    assert_eq!(loc, "/?page=1&section=rent");
}
