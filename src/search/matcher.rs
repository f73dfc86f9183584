// src/search/matcher.rs

use crate::search::PAGE_SIZE;

/// Numeric words above this are also matched by price proximity.
const PROXIMITY_FLOOR: f64 = 1000.0;
/// Relative distance allowed for a proximity match.
const PROXIMITY_TOLERANCE: f64 = 0.05;

/// The fields of a listing the free-text matcher looks at.
pub trait SearchableListing {
    fn name(&self) -> &str;
    fn address(&self) -> &str;
    fn city(&self) -> &str;
    fn state(&self) -> &str;
    fn country(&self) -> &str;
    fn postcode(&self) -> &str;
    fn price(&self) -> f64;
}

/// A lower-cased, whitespace-split search term. Every word has to match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    words: Vec<String>,
}

impl SearchTerm {
    /// `None` when the term has no words.
    pub fn parse(raw: &str) -> Option<Self> {
        let words: Vec<String> = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        (!words.is_empty()).then_some(Self { words })
    }

    pub fn matches<T: SearchableListing + ?Sized>(&self, listing: &T) -> bool {
        self.words.iter().all(|w| word_matches(w, listing))
    }

    /// Keeps matching listings, in their original order.
    pub fn filter<T: SearchableListing>(&self, listings: Vec<T>) -> Vec<T> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }
}

fn word_matches<T: SearchableListing + ?Sized>(word: &str, listing: &T) -> bool {
    let text_fields = [
        listing.name(),
        listing.address(),
        listing.city(),
        listing.state(),
        listing.country(),
    ];
    if text_fields
        .iter()
        .any(|field| field.to_lowercase().contains(word))
        || listing.postcode().contains(word)
    {
        return true;
    }

    let Some((digits, value)) = numeric_word(word) else {
        return false;
    };

    let price = listing.price();
    if plain_decimal(price).contains(&digits) {
        return true;
    }

    value > PROXIMITY_FLOOR && (price - value).abs() / value <= PROXIMITY_TOLERANCE
}

/// Strips grouping commas and anything that is not part of a number, then
/// reads the leading numeric part. Returns the numeric text and its value.
fn numeric_word(word: &str) -> Option<(String, f64)> {
    let cleaned: String = word
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let bytes = cleaned.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }
    if !has_digits {
        return None;
    }

    let numeric = &cleaned[..end];
    let value = numeric.trim_end_matches('.').parse::<f64>().ok()?;
    Some((numeric.to_string(), value))
}

fn plain_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// `(total, total_pages)` for a result set that was re-screened locally.
pub fn local_page_totals(matched: usize) -> (u64, u32) {
    let pages = matched.div_ceil(PAGE_SIZE).max(1);
    (matched as u64, u32::try_from(pages).unwrap_or(u32::MAX))
}
