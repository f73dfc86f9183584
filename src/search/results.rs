// src/search/results.rs

use crate::api::{ApiFilter, ListingSource, PropertyResult, PropertyTypeOption};
use crate::search::codec;
use crate::search::matcher::{local_page_totals, SearchTerm};
use crate::search::query::QueryRepresentation;
use crate::search::sort;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load properties. Please try again later.";

/// Sort used when sampling listings to discover property types.
const TYPE_DISCOVERY_SORT: &str = "-createdAt";

/// One page of listings ready to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub items: Vec<PropertyResult>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    /// Page-level message when the fetch failed.
    pub error: Option<String>,
}

/// Fetches the page described by `query`.
///
/// With a search term the API is asked without `name` and the returned page
/// is screened locally instead; totals then describe the screened set.
pub fn load_results<L: ListingSource>(source: &L, query: &QueryRepresentation) -> SearchResults {
    let filter = codec::decode(query);
    let page = query.page();
    let sort_token = sort::resolve(query.sort());
    let term = filter.search_term().and_then(SearchTerm::parse);

    let mut body = ApiFilter::from_filter(&filter);
    if term.is_some() {
        body.name = None;
    }

    let resp = match source.search_properties(page, sort_token, &body) {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, page, sort = sort_token, "listing fetch failed");
            return SearchResults {
                page,
                error: Some(FETCH_FAILED_MESSAGE.to_string()),
                ..SearchResults::default()
            };
        }
    };

    let (total, total_pages) = resp.pagination();
    let mut results = SearchResults {
        items: resp.items,
        total,
        page,
        total_pages,
        error: None,
    };

    if let Some(term) = term {
        if !results.items.is_empty() {
            let before = results.items.len();
            results.items = term.filter(std::mem::take(&mut results.items));
            let (total, pages) = local_page_totals(results.items.len());
            results.total = total;
            results.total_pages = u64::from(pages);
            debug!(before, after = results.items.len(), "screened page by search term");
        }
    }

    results
}

/// Options for the property-type facet.
///
/// Asks the dedicated endpoint first; if that fails or answers in an unknown
/// shape, samples listings and derives the distinct types. Empty when both
/// fail.
pub fn property_type_options<L: ListingSource>(
    source: &L,
    category: Option<&str>,
) -> Vec<PropertyTypeOption> {
    match source.property_types(category) {
        Ok(v) => {
            if let Some(options) = options_from_value(v) {
                return options;
            }
            debug!("property-types answered in an unknown shape; deriving from listings");
        }
        Err(_) => debug!("deriving property types from listings"),
    }

    match source.search_properties(1, TYPE_DISCOVERY_SORT, &ApiFilter::for_category(category)) {
        Ok(resp) => derive_type_options(&resp.items),
        Err(e) => {
            warn!(error = %e, "could not load property types");
            Vec::new()
        }
    }
}

fn options_from_value(v: Value) -> Option<Vec<PropertyTypeOption>> {
    let arr = match v {
        Value::Array(arr) => arr,
        Value::Object(mut map) => match (map.remove("data"), map.remove("types")) {
            (Some(Value::Array(arr)), _) => arr,
            (_, Some(Value::Array(arr))) => arr,
            _ => return None,
        },
        _ => return None,
    };
    serde_json::from_value(Value::Array(arr)).ok()
}

fn derive_type_options(items: &[PropertyResult]) -> Vec<PropertyTypeOption> {
    let types: BTreeSet<&str> = items
        .iter()
        .map(|p| p.property_type.trim())
        .filter(|t| !t.is_empty())
        .collect();

    types
        .into_iter()
        .map(|value| PropertyTypeOption {
            value: value.to_string(),
            label: type_label(value),
        })
        .collect()
}

/// `semi-detached-house` -> `Semi Detached House`
pub fn type_label(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_support::StubSource;
    use serde_json::json;

    fn listings() -> Value {
        json!({
            "items": [
                {"id": "1", "name": "Sunway Tower", "city": "Subang", "price": 450000, "type": "condominium"},
                {"id": "2", "name": "Green Acres", "city": "Ipoh", "price": 300000, "type": "semi-detached-house"},
                {"id": "3", "name": "Kiara Villa", "city": "Kuala Lumpur", "price": 1200000, "type": "condominium"}
            ],
            "_meta": {"totalCount": 3000, "pageCount": 300, "currentPage": 1, "perPage": 10}
        })
    }

    #[test]
    fn end_to_end_body_for_subang_query() {
        let source = StubSource::with_listings(listings());
        let q = QueryRepresentation::parse(
            "section=sale&categories=residential&minPrice=200000&bedRooms=2,3&location=Subang",
        );

        let results = load_results(&source, &q);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        let (page, sort, body) = &calls[0];
        assert_eq!(*page, 1);
        assert_eq!(sort, "createdAt");
        assert_eq!(
            body,
            &json!({
                "section": "sale",
                "categories": ["residential"],
                "minPrice": 200000,
                "bedRooms": [2, 3]
            })
        );

        let names: Vec<_> = results.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sunway Tower"]);
        assert_eq!(results.total, 1);
        assert_eq!(results.total_pages, 1);
        assert_eq!(results.error, None);
    }

    #[test]
    fn without_term_api_totals_are_used() {
        let source = StubSource::with_listings(listings());
        let q = QueryRepresentation::parse("page=4&sort=priceHighToLow");

        let results = load_results(&source, &q);

        let (page, sort, _) = &source.calls()[0];
        assert_eq!((*page, sort.as_str()), (4, "-price"));
        assert_eq!(results.items.len(), 3);
        assert_eq!((results.total, results.total_pages), (3000, 300));
        assert_eq!(results.page, 4);
    }

    #[test]
    fn name_is_dropped_from_body_when_matching_locally() {
        let source = StubSource::with_listings(listings());
        let q = QueryRepresentation::parse("name=Kiara&location=Kiara");
        let results = load_results(&source, &q);

        let (_, _, body) = &source.calls()[0];
        assert!(body.get("name").is_none());
        assert_eq!(results.items.len(), 1);
    }

    #[test]
    fn fetch_failure_yields_empty_page_with_message() {
        let source = StubSource::failing();
        let q = QueryRepresentation::parse("page=2&bedRooms=2");
        let results = load_results(&source, &q);

        assert!(results.items.is_empty());
        assert_eq!(results.total, 0);
        assert_eq!(results.page, 2);
        assert_eq!(results.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn type_options_from_dedicated_endpoint() {
        let source = StubSource::with_listings(listings())
            .with_types(json!({"data": [{"value": "bungalow", "label": "Bungalow"}]}));
        let options = property_type_options(&source, Some("residential"));
        assert_eq!(
            options,
            vec![PropertyTypeOption {
                value: "bungalow".into(),
                label: "Bungalow".into()
            }]
        );
        assert!(source.calls().is_empty());
    }

    #[test]
    fn type_options_fall_back_to_listing_sample() {
        let source = StubSource::with_listings(listings()).with_types(json!({"unexpected": true}));
        let options = property_type_options(&source, Some("all"));

        let values: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(values, vec!["Condominium", "Semi Detached House"]);

        let (page, sort, body) = &source.calls()[0];
        assert_eq!((*page, sort.as_str()), (1, "-createdAt"));
        assert_eq!(body, &json!({"section": "sale"}));
    }

    #[test]
    fn type_options_empty_when_everything_fails() {
        assert!(property_type_options(&StubSource::failing(), None).is_empty());
    }

    #[test]
    fn type_labels() {
        assert_eq!(type_label("semi-detached-house"), "Semi Detached House");
        assert_eq!(type_label("condominium"), "Condominium");
        assert_eq!(type_label("2-storey terrace"), "2 Storey Terrace");
    }
}
