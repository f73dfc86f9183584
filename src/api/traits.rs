use crate::api::models::{ApiFilter, PropertiesResponse};
use crate::api::ApiError;
use serde_json::Value;

/// Remote listing data. The web handlers only ever see this trait, so tests
/// can swap in canned responses.
pub trait ListingSource {
    /// `POST /properties-mock?page={page}&sort={sort}` with `body`.
    fn search_properties(
        &self,
        page: u32,
        sort: &str,
        body: &ApiFilter,
    ) -> Result<PropertiesResponse, ApiError>;

    /// `GET /property-types?category={category}`, returned raw since the
    /// shape varies.
    fn property_types(&self, category: Option<&str>) -> Result<Value, ApiError>;
}

impl<T: ListingSource + ?Sized> ListingSource for &T {
    fn search_properties(
        &self,
        page: u32,
        sort: &str,
        body: &ApiFilter,
    ) -> Result<PropertiesResponse, ApiError> {
        (**self).search_properties(page, sort, body)
    }

    fn property_types(&self, category: Option<&str>) -> Result<Value, ApiError> {
        (**self).property_types(category)
    }
}
