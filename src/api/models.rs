use crate::api::ApiError;
use crate::search::filter::{Filter, Furnishing, Price, Section, Tenure};
use crate::search::matcher::SearchableListing;
use crate::search::PAGE_SIZE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

// PropertyResult
//  ├── id, name, slug, type, category, section
//  ├── image, bedRooms, bathRooms, floorSize, landSize
//  ├── address, city, state, postcode, country
//  ├── price, furnishings, isAuction, createdAt
//  ├── account
//  │    ├── id, name, email, phone, slug
//  │    └── avatar, verified
//  └── coordinates
//       ├── longitude
//       └── latitude

/// Shown when a listing has no image of its own.
pub const STOCK_IMAGE: &str =
    "https://images.unsplash.com/photo-1564013799919-ab600027ffc6?auto=format&fit=crop&w=800&q=80";

pub const FALLBACK_AGENT_NAME: &str = "Authorized Agent";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyResult {
    #[serde(deserialize_with = "lenient::string", alias = "_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub slug: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub property_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(deserialize_with = "lenient::string")]
    pub section: String,
    #[serde(deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(deserialize_with = "lenient::opt_count")]
    pub bed_rooms: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_count")]
    pub bath_rooms: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub floor_size: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub land_size: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::loose")]
    pub account: Account,
    #[serde(deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(deserialize_with = "lenient::string")]
    pub city: String,
    #[serde(deserialize_with = "lenient::string")]
    pub postcode: String,
    #[serde(deserialize_with = "lenient::string")]
    pub furnishings: String,
    #[serde(deserialize_with = "lenient::loose")]
    pub coordinates: Option<Coordinates>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_auction: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: String,
    /// Some records nest city/state here instead of at the top level.
    #[serde(deserialize_with = "lenient::loose")]
    pub location: Option<NestedLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub slug: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub avatar: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub verified: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    #[serde(deserialize_with = "lenient::number")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NestedLocation {
    #[serde(deserialize_with = "lenient::string")]
    pub city: String,
    #[serde(deserialize_with = "lenient::string")]
    pub state: String,
}

impl PropertyResult {
    fn effective_city(&self) -> &str {
        match &self.location {
            Some(loc) if self.city.is_empty() => &loc.city,
            _ => &self.city,
        }
    }

    fn effective_state(&self) -> &str {
        match &self.location {
            Some(loc) if self.state.is_empty() => &loc.state,
            _ => &self.state,
        }
    }

    pub fn image_url(&self) -> &str {
        if self.image.trim().is_empty() {
            STOCK_IMAGE
        } else {
            &self.image
        }
    }

    pub fn agent_name(&self) -> &str {
        if self.account.name.trim().is_empty() {
            FALLBACK_AGENT_NAME
        } else {
            &self.account.name
        }
    }

    /// Leading numeric part of `floorSize`, when positive.
    pub fn floor_area(&self) -> Option<f64> {
        let raw = self.floor_size.as_deref()?.trim();
        let end = raw
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map_or(raw.len(), |(i, _)| i);
        raw[..end].parse::<f64>().ok().filter(|a| *a > 0.0)
    }

    /// Price per square foot, rounded.
    pub fn psf(&self) -> Option<f64> {
        self.floor_area().map(|area| (self.price / area).round())
    }

    /// `RM 450,000`
    pub fn price_label(&self) -> String {
        format!("RM {}", group_thousands(self.price.round()))
    }

    /// `RM 500 psf`, or `-` when there is no floor size.
    pub fn psf_label(&self) -> String {
        match self.psf() {
            Some(psf) => format!("RM {} psf", group_thousands(psf)),
            None => "-".to_string(),
        }
    }

    pub fn location_line(&self) -> String {
        [self.address.as_str(), self.effective_city(), self.effective_state()]
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl SearchableListing for PropertyResult {
    fn name(&self) -> &str {
        &self.name
    }
    fn address(&self) -> &str {
        &self.address
    }
    fn city(&self) -> &str {
        self.effective_city()
    }
    fn state(&self) -> &str {
        self.effective_state()
    }
    fn country(&self) -> &str {
        &self.country
    }
    fn postcode(&self) -> &str {
        &self.postcode
    }
    fn price(&self) -> f64 {
        self.price
    }
}

/// Digits grouped by commas (`1234567` -> `1,234,567`). Rounds to whole.
pub fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(deserialize_with = "lenient::count")]
    pub total_count: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub page_count: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub current_page: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub per_page: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesResponse {
    pub items: Vec<PropertyResult>,
    pub total: Option<u64>,
    pub page: Option<u64>,
    pub total_pages: Option<u64>,
    pub meta: Option<PageMeta>,
    /// The API answered with a bare array instead of an envelope.
    pub bare: bool,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Envelope {
    #[serde(deserialize_with = "lenient::nullable")]
    items: Vec<PropertyResult>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    total: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    page: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    total_pages: Option<u64>,
    #[serde(rename = "_meta")]
    meta: Option<PageMeta>,
}

impl PropertiesResponse {
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(_) => {
                let items: Vec<PropertyResult> = serde_json::from_value(value)
                    .map_err(|e| ApiError::JsonParse(e.to_string()))?;
                Ok(Self {
                    items,
                    bare: true,
                    ..Self::default()
                })
            }
            Value::Object(_) => {
                let env: Envelope = serde_json::from_value(value)
                    .map_err(|e| ApiError::JsonParse(e.to_string()))?;
                Ok(Self {
                    items: env.items,
                    total: env.total,
                    page: env.page,
                    total_pages: env.total_pages,
                    meta: env.meta,
                    bare: false,
                })
            }
            other => Err(ApiError::UnexpectedShape(format!(
                "properties response is neither an object nor an array: {other}"
            ))),
        }
    }

    /// `(total, total_pages)`. `_meta` wins over the top-level fields, and
    /// zero counts fall back to what was actually returned.
    pub fn pagination(&self) -> (u64, u64) {
        let returned = self.items.len() as u64;
        if self.bare {
            return (returned, 1);
        }
        if let Some(meta) = self.meta {
            let total = nonzero(meta.total_count).unwrap_or(returned);
            let pages = nonzero(meta.page_count).unwrap_or(1);
            return (total, pages);
        }
        let total = self.total.and_then(nonzero).unwrap_or(returned);
        let pages = self
            .total_pages
            .and_then(nonzero)
            .unwrap_or_else(|| total.div_ceil(PAGE_SIZE as u64));
        (total, pages)
    }
}

fn nonzero(n: u64) -> Option<u64> {
    (n != 0).then_some(n)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyTypeOption {
    #[serde(deserialize_with = "lenient::string")]
    pub value: String,
    #[serde(deserialize_with = "lenient::string")]
    pub label: String,
}

/// Request body for `POST /properties-mock`. Never carries `location`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilter {
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub types: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub bed_rooms: BTreeSet<u32>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub bath_rooms: BTreeSet<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tenure: BTreeSet<Tenure>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub furnishings: BTreeSet<Furnishing>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_auction: bool,
}

impl ApiFilter {
    pub fn from_filter(filter: &Filter) -> Self {
        Self {
            section: filter.section,
            name: filter.name.clone(),
            categories: filter.categories.clone(),
            types: filter.types.clone(),
            bed_rooms: filter.bed_rooms.clone(),
            bath_rooms: filter.bath_rooms.clone(),
            min_price: filter.min_price,
            max_price: filter.max_price,
            tenure: filter.tenure.clone(),
            furnishings: filter.furnishings.clone(),
            is_auction: filter.is_auction,
        }
    }

    /// Body used to discover property types when the dedicated endpoint
    /// is unavailable.
    pub fn for_category(category: Option<&str>) -> Self {
        let mut body = Self::default();
        if let Some(c) = category.filter(|c| *c != "all") {
            body.categories.insert(c.to_string());
        }
        body
    }
}

/// Deserializers that accept whatever the upstream happens to send: nulls,
/// numbers where strings are expected and the reverse.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_f64(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(as_f64(&Value::deserialize(d)?)
            .filter(|n| n.is_finite())
            .unwrap_or_default())
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(as_f64(&Value::deserialize(d)?)
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(as_f64(&Value::deserialize(d)?)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(opt_u64(d)?.unwrap_or_default())
    }

    pub fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    /// Any shape that does not fit `T` reads as `T::default()`.
    pub fn loose<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::String(s) => s == "true",
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::codec;
    use crate::search::query::QueryRepresentation;
    use serde_json::json;

    #[test]
    fn tolerates_missing_and_odd_fields() {
        let v = json!({
            "id": 17,
            "name": "Sunway Tower",
            "postcode": 47500,
            "price": "450000",
            "floorSize": 900,
            "bedRooms": null,
            "bathRooms": 2,
            "account": null,
            "isAuction": "true"
        });
        let p: PropertyResult = serde_json::from_value(v).unwrap();
        assert_eq!(p.id, "17");
        assert_eq!(p.postcode, "47500");
        assert_eq!(p.price, 450000.0);
        assert_eq!(p.floor_size.as_deref(), Some("900"));
        assert_eq!(p.bed_rooms, None);
        assert_eq!(p.bath_rooms, Some(2));
        assert!(p.is_auction);
        assert_eq!(p.agent_name(), FALLBACK_AGENT_NAME);
        assert_eq!(p.image_url(), STOCK_IMAGE);
    }

    #[test]
    fn card_labels() {
        let p = PropertyResult {
            price: 450000.0,
            floor_size: Some("900 sqft".into()),
            ..PropertyResult::default()
        };
        assert_eq!(p.price_label(), "RM 450,000");
        assert_eq!(p.psf_label(), "RM 500 psf");

        let no_area = PropertyResult {
            price: 1.0,
            floor_size: Some("0".into()),
            ..PropertyResult::default()
        };
        assert_eq!(no_area.psf_label(), "-");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
    }

    #[test]
    fn odd_nested_shapes_are_ignored() {
        let p: PropertyResult = serde_json::from_value(json!({
            "name": "Kiara Villa",
            "account": "agent-7",
            "location": "Kuala Lumpur",
            "coordinates": "3.1,101.6"
        }))
        .unwrap();
        assert_eq!(p.name, "Kiara Villa");
        assert_eq!(p.account, Account::default());
        assert_eq!(p.location, None);
        assert_eq!(p.coordinates, None);
    }

    #[test]
    fn coordinate_pairs_read_longitude_first() {
        let p: PropertyResult =
            serde_json::from_value(json!({"coordinates": [101.6, 3.1]})).unwrap();
        assert_eq!(
            p.coordinates,
            Some(Coordinates {
                longitude: 101.6,
                latitude: 3.1
            })
        );
    }

    #[test]
    fn nested_location_fills_city() {
        let p: PropertyResult =
            serde_json::from_value(json!({"location": {"city": "Ipoh", "state": "Perak"}})).unwrap();
        assert_eq!(SearchableListing::city(&p), "Ipoh");
        assert_eq!(p.location_line(), "Ipoh, Perak");
    }

    #[test]
    fn meta_takes_precedence() {
        let r = PropertiesResponse::from_value(json!({
            "items": [{}, {}],
            "total": 99,
            "totalPages": 9,
            "_meta": {"totalCount": 42, "pageCount": 5, "currentPage": 1, "perPage": 10}
        }))
        .unwrap();
        assert_eq!(r.pagination(), (42, 5));
    }

    #[test]
    fn top_level_totals_and_fallbacks() {
        let r = PropertiesResponse::from_value(json!({"items": [{}, {}, {}], "total": 25})).unwrap();
        assert_eq!(r.pagination(), (25, 3));

        let r = PropertiesResponse::from_value(json!({"items": [{}], "_meta": {}})).unwrap();
        assert_eq!(r.pagination(), (1, 1));

        let r = PropertiesResponse::from_value(json!([{}, {}])).unwrap();
        assert_eq!(r.pagination(), (2, 1));

        assert!(matches!(
            PropertiesResponse::from_value(json!("nope")),
            Err(ApiError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn api_body_from_query() {
        let q = QueryRepresentation::parse(
            "section=rent&location=Subang&categories=commercial&types=shop-office&bedRooms=2,3&furnishings=partially&minPrice=100000&isAuction=false",
        );
        let body = serde_json::to_value(ApiFilter::from_filter(&codec::decode(&q))).unwrap();
        assert_eq!(
            body,
            json!({
                "section": "rent",
                "categories": ["commercial"],
                "types": ["shop-office"],
                "bedRooms": [2, 3],
                "furnishings": ["partially-furnished"],
                "minPrice": 100000
            })
        );
    }

    #[test]
    fn empty_filter_still_sends_section() {
        let body = serde_json::to_value(ApiFilter::from_filter(&Filter::default())).unwrap();
        assert_eq!(body, json!({"section": "sale"}));
    }

    #[test]
    fn category_body_skips_all() {
        assert!(ApiFilter::for_category(Some("all")).categories.is_empty());
        assert_eq!(
            ApiFilter::for_category(Some("residential")).categories,
            BTreeSet::from(["residential".to_string()])
        );
    }
}
