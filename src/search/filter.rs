// src/search/filter.rs

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Which listing inventory to query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Sale,
    Rent,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Sale => "sale",
            Section::Rent => "rent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "sale" => Some(Section::Sale),
            "rent" => Some(Section::Rent),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Sale => "Sale",
            Section::Rent => "Rent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tenure {
    #[serde(rename = "freehold")]
    Freehold,
    #[serde(rename = "leasehold")]
    Leasehold,
    #[serde(rename = "na")]
    NotApplicable,
}

impl Tenure {
    pub const ALL: [Tenure; 3] = [Tenure::Freehold, Tenure::Leasehold, Tenure::NotApplicable];

    pub fn as_str(self) -> &'static str {
        match self {
            Tenure::Freehold => "freehold",
            Tenure::Leasehold => "leasehold",
            Tenure::NotApplicable => "na",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tenure::Freehold => "Freehold",
            Tenure::Leasehold => "Leasehold",
            Tenure::NotApplicable => "N/A",
        }
    }
}

/// Furnishing level. The URL carries the short UI codes (`partially`,
/// `fully`); the API wants the hyphenated ones, which is what serde emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Furnishing {
    Unfurnished,
    PartiallyFurnished,
    FullyFurnished,
}

impl Furnishing {
    pub const ALL: [Furnishing; 3] = [
        Furnishing::Unfurnished,
        Furnishing::PartiallyFurnished,
        Furnishing::FullyFurnished,
    ];

    pub fn ui_code(self) -> &'static str {
        match self {
            Furnishing::Unfurnished => "unfurnished",
            Furnishing::PartiallyFurnished => "partially",
            Furnishing::FullyFurnished => "fully",
        }
    }

    pub fn api_code(self) -> &'static str {
        match self {
            Furnishing::Unfurnished => "unfurnished",
            Furnishing::PartiallyFurnished => "partially-furnished",
            Furnishing::FullyFurnished => "fully-furnished",
        }
    }

    /// Accepts either the UI code or the API code.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.ui_code() == raw || f.api_code() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            Furnishing::Unfurnished => "Unfurnished",
            Furnishing::PartiallyFurnished => "Partially Furnished",
            Furnishing::FullyFurnished => "Fully Furnished",
        }
    }
}

/// A non-negative, finite price bound.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            // normalise -0.0
            Some(Self(value + 0.0))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    fn as_whole(self) -> Option<u64> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        (self.0.fract() == 0.0 && self.0 <= MAX_EXACT).then_some(self.0 as u64)
    }
}

/// Plain decimal, no grouping, no exponent.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_whole() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Whole prices go out as JSON integers (`200000`, not `200000.0`).
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_whole() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Structured search criteria. Empty sets and `None` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub section: Section,
    pub name: Option<String>,
    /// UI-only; merged into client-side matching, never sent to the API.
    pub location: Option<String>,
    pub categories: BTreeSet<String>,
    pub types: BTreeSet<String>,
    /// `0` is a studio.
    pub bed_rooms: BTreeSet<u32>,
    pub bath_rooms: BTreeSet<u32>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub tenure: BTreeSet<Tenure>,
    pub furnishings: BTreeSet<Furnishing>,
    pub is_auction: bool,
}

impl Filter {
    /// Count shown on the Filters badge and stored on saved searches.
    ///
    /// Each price bound counts once, categories and types together count
    /// once, auction counts once, and every selected tenure, furnishing,
    /// bedroom and bathroom value counts individually.
    pub fn facet_count(&self) -> usize {
        let mut count = 0;
        count += usize::from(self.min_price.is_some());
        count += usize::from(self.max_price.is_some());
        count += usize::from(!self.categories.is_empty() || !self.types.is_empty());
        count += self.tenure.len();
        count += self.furnishings.len();
        count += usize::from(self.is_auction);
        count += self.beds_baths_count();
        count
    }

    pub fn beds_baths_count(&self) -> usize {
        self.bed_rooms.len() + self.bath_rooms.len()
    }

    /// Free-text term used for client-side matching: `name` first, then
    /// `location`.
    pub fn search_term(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.location.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Label for a bedroom value in the UI.
pub fn bedroom_label(n: u32) -> String {
    match n {
        0 => "Studio".to_string(),
        5 => "5+".to_string(),
        n => n.to_string(),
    }
}
