mod api_error;
mod client;
pub mod models;
mod traits;

pub use api_error::ApiError;
pub use client::HttpListingSource;
pub use models::{ApiFilter, PropertiesResponse, PropertyResult, PropertyTypeOption};
pub use traits::ListingSource;
