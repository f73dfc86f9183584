//! Conversion between [`Filter`] and the flat URL form.
//!
//! Both directions are total. `decode` never fails: anything it cannot make
//! sense of is treated as "not filtered on".

use crate::search::filter::{Filter, Furnishing, Price, Section, Tenure};
use crate::search::query::{keys, QueryRepresentation};
use std::collections::BTreeSet;

pub const LIST_DELIMITER: char = ',';

pub fn encode(filter: &Filter) -> QueryRepresentation {
    let mut q = QueryRepresentation::new();

    q.set(keys::SECTION, filter.section.as_str());
    q.set_or_remove(keys::NAME, non_blank(filter.name.as_deref()));
    q.set_or_remove(keys::LOCATION, non_blank(filter.location.as_deref()));

    q.set(keys::CATEGORIES, join(filter.categories.iter()));
    q.set(keys::TYPES, join(filter.types.iter()));
    q.set(keys::BED_ROOMS, join(filter.bed_rooms.iter()));
    q.set(keys::BATH_ROOMS, join(filter.bath_rooms.iter()));
    q.set(keys::TENURE, join(filter.tenure.iter().map(|t| t.as_str())));
    q.set(
        keys::FURNISHINGS,
        join(filter.furnishings.iter().map(|f| f.ui_code())),
    );

    q.set_or_remove(keys::MIN_PRICE, filter.min_price.map(|p| p.to_string()));
    q.set_or_remove(keys::MAX_PRICE, filter.max_price.map(|p| p.to_string()));

    if filter.is_auction {
        q.set(keys::IS_AUCTION, "true");
    }

    q
}

pub fn decode(q: &QueryRepresentation) -> Filter {
    Filter {
        section: q
            .get(keys::SECTION)
            .and_then(Section::parse)
            .unwrap_or_default(),
        name: non_blank(q.get(keys::NAME)),
        location: non_blank(q.get(keys::LOCATION)),
        categories: split(q.get(keys::CATEGORIES))
            .map(str::to_string)
            .collect(),
        types: split(q.get(keys::TYPES)).map(str::to_string).collect(),
        bed_rooms: decode_rooms(q.get(keys::BED_ROOMS)),
        bath_rooms: decode_rooms(q.get(keys::BATH_ROOMS)),
        min_price: q.get(keys::MIN_PRICE).and_then(parse_price),
        max_price: q.get(keys::MAX_PRICE).and_then(parse_price),
        tenure: split(q.get(keys::TENURE)).filter_map(Tenure::parse).collect(),
        furnishings: split(q.get(keys::FURNISHINGS))
            .filter_map(Furnishing::parse)
            .collect(),
        is_auction: q.get(keys::IS_AUCTION) == Some("true"),
    }
}

/// First category in URL order, which scopes the property-type lookup.
pub fn first_category(q: &QueryRepresentation) -> Option<&str> {
    split(q.get(keys::CATEGORIES)).next()
}

/// Room counts as they go into the URL: studio stays `0`.
pub fn encode_rooms(rooms: &BTreeSet<u32>) -> String {
    join(rooms.iter())
}

/// Parses a bedroom/bathroom list. `Studio` (any case) is `0`; tokens that
/// are not non-negative integers are skipped.
pub fn decode_rooms(raw: Option<&str>) -> BTreeSet<u32> {
    split(raw).filter_map(parse_room).collect()
}

fn parse_room(token: &str) -> Option<u32> {
    if token.eq_ignore_ascii_case("studio") {
        return Some(0);
    }
    token.strip_suffix('+').unwrap_or(token).parse().ok()
}

fn parse_price(raw: &str) -> Option<Price> {
    raw.trim().parse::<f64>().ok().and_then(Price::new)
}

/// Lenient parse for what a user types into a price box: grouping commas,
/// spaces and an `RM` prefix are ignored. Blank or unparseable input is
/// `None`.
pub fn parse_price_input(raw: &str) -> Option<Price> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("RM")
        .trim_start_matches("rm")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    parse_price(&cleaned)
}

fn split(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    items
        .into_iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_string)
}
