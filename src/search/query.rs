use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// URL keys that make up the search state. Anything else on the URL is
/// either UI chrome (see `search::ui`) or noise.
pub mod keys {
    pub const PAGE: &str = "page";
    pub const SORT: &str = "sort";
    pub const MIN_PRICE: &str = "minPrice";
    pub const MAX_PRICE: &str = "maxPrice";
    pub const CATEGORIES: &str = "categories";
    pub const TYPES: &str = "types";
    pub const BED_ROOMS: &str = "bedRooms";
    pub const BATH_ROOMS: &str = "bathRooms";
    pub const TENURE: &str = "tenure";
    pub const FURNISHINGS: &str = "furnishings";
    pub const IS_AUCTION: &str = "isAuction";
    pub const SECTION: &str = "section";
    pub const LOCATION: &str = "location";
    pub const NAME: &str = "name";

    pub const ALL: [&str; 14] = [
        PAGE,
        SORT,
        MIN_PRICE,
        MAX_PRICE,
        CATEGORIES,
        TYPES,
        BED_ROOMS,
        BATH_ROOMS,
        TENURE,
        FURNISHINGS,
        IS_AUCTION,
        SECTION,
        LOCATION,
        NAME,
    ];

    pub fn is_search_key(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// Flat string-keyed form of the search state, i.e. what lives in the URL.
///
/// Keys are kept sorted so two representations with the same keys and values
/// compare equal regardless of the order they were written in. An empty value
/// is never stored: setting a key to `""` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRepresentation(BTreeMap<String, String>);

impl QueryRepresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps recognised search keys only; the first occurrence of a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (k, v) in pairs {
            let (k, v) = (k.as_ref(), v.as_ref());
            if keys::is_search_key(k) && !v.is_empty() && !map.contains_key(k) {
                map.insert(k.to_string(), v.to_string());
            }
        }
        Self(map)
    }

    /// Parse a raw url-encoded query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(raw.as_bytes()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.0.remove(key);
        } else {
            self.0.insert(key.to_string(), value);
        }
    }

    pub fn set_or_remove(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn without_page(&self) -> Self {
        let mut q = self.clone();
        q.remove(keys::PAGE);
        q
    }

    pub fn with_page(&self, page: u32) -> Self {
        let mut q = self.clone();
        q.set(keys::PAGE, page.max(1).to_string());
        q
    }

    /// 1-based page, falling back to 1 for anything missing or unparseable.
    pub fn page(&self) -> u32 {
        self.get(keys::PAGE)
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn sort(&self) -> &str {
        self.get(keys::SORT).unwrap_or("default")
    }

    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.iter() {
            ser.append_pair(k, v);
        }
        ser.finish()
    }
}
