// src/forms.rs
use crate::errors::ServerError;
use crate::search::codec::{self, LIST_DELIMITER};
use crate::search::controller::BedsBathsDraft;
use crate::search::filter::Filter;
use crate::search::query::{keys, QueryRepresentation};
use astra::Request;
use std::io::Read;
use url::form_urlencoded;

/// Hidden field every action form uses to carry the committed query.
pub const CURRENT_QUERY_FIELD: &str = "q";

/// Category select value meaning "no category".
const ANY_CATEGORY: &str = "all";

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Decoded `application/x-www-form-urlencoded` pairs, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn parse(raw: &str) -> Self {
        Self(
            form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Reads the request body. Bodies over `MAX_FORM_BYTES` are rejected
    /// whole.
    pub fn read(req: &mut Request) -> Result<Self, ServerError> {
        Self::from_reader(req.body_mut().reader())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, ServerError> {
        let mut raw = String::new();
        reader
            .take(MAX_FORM_BYTES + 1)
            .read_to_string(&mut raw)
            .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
        if raw.len() as u64 > MAX_FORM_BYTES {
            return Err(ServerError::BadRequest(format!(
                "form body exceeds {MAX_FORM_BYTES} bytes"
            )));
        }
        Ok(Self::parse(&raw))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query carried in the hidden `q` field; empty when absent.
    pub fn current_query(&self) -> QueryRepresentation {
        QueryRepresentation::parse(self.get(CURRENT_QUERY_FIELD).unwrap_or_default())
    }

    fn joined(&self, key: &str) -> String {
        self.all(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(&LIST_DELIMITER.to_string())
    }
}

/// The raw query string of a request URI, or empty.
pub fn request_query(req: &Request) -> &str {
    req.uri().query().unwrap_or_default()
}

/// Facets posted by the full filter panel. Check boxes arrive as repeated
/// fields, price inputs may contain `RM` and thousands separators.
pub fn filter_from_form(form: &FormData) -> Filter {
    let mut q = QueryRepresentation::new();
    let category = form
        .get(keys::CATEGORIES)
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ANY_CATEGORY);
    q.set_or_remove(keys::CATEGORIES, category.map(str::to_string));

    for key in [
        keys::TYPES,
        keys::BED_ROOMS,
        keys::BATH_ROOMS,
        keys::TENURE,
        keys::FURNISHINGS,
    ] {
        q.set(key, form.joined(key));
    }
    if form.all(keys::IS_AUCTION).any(|v| v == "true") {
        q.set(keys::IS_AUCTION, "true");
    }

    let mut filter = codec::decode(&q);
    filter.min_price = form.get(keys::MIN_PRICE).and_then(codec::parse_price_input);
    filter.max_price = form.get(keys::MAX_PRICE).and_then(codec::parse_price_input);
    filter
}

pub fn beds_baths_from_form(form: &FormData) -> BedsBathsDraft {
    BedsBathsDraft {
        beds: codec::decode_rooms(Some(&form.joined(keys::BED_ROOMS))),
        baths: codec::decode_rooms(Some(&form.joined(keys::BATH_ROOMS))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filter::{Furnishing, Price, Tenure};
    use std::collections::BTreeSet;

    #[test]
    fn oversized_body_is_rejected() {
        let at_limit = format!("term={}", "a".repeat(MAX_FORM_BYTES as usize - 5));
        let form = FormData::from_reader(at_limit.as_bytes()).expect("body at the limit");
        assert_eq!(form.get("term").map(str::len), Some(MAX_FORM_BYTES as usize - 5));

        let over = format!("{at_limit}a");
        assert!(matches!(
            FormData::from_reader(over.as_bytes()),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn repeated_fields_and_hidden_query() {
        let form = FormData::parse("q=page%3D3%26section%3Drent&bedRooms=1&bedRooms=Studio");
        assert_eq!(form.current_query().get("section"), Some("rent"));
        assert_eq!(form.all("bedRooms").collect::<Vec<_>>(), vec!["1", "Studio"]);
        assert_eq!(beds_baths_from_form(&form).beds, BTreeSet::from([0, 1]));
    }

    #[test]
    fn filter_panel_fields() {
        let form = FormData::parse(
            "categories=all&types=condominium&types=bungalow&minPrice=RM+200%2C000&maxPrice=\
             &tenure=freehold&tenure=bogus&furnishings=fully&isAuction=true",
        );
        let f = filter_from_form(&form);
        assert!(f.categories.is_empty());
        assert_eq!(f.types.len(), 2);
        assert_eq!(f.min_price, Price::new(200000.0));
        assert_eq!(f.max_price, None);
        assert_eq!(f.tenure, BTreeSet::from([Tenure::Freehold]));
        assert_eq!(f.furnishings, BTreeSet::from([Furnishing::FullyFurnished]));
        assert!(f.is_auction);
    }

    #[test]
    fn empty_form_is_empty_filter() {
        assert_eq!(filter_from_form(&FormData::default()), Filter::default());
    }
}
