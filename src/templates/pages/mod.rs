pub mod error;
pub mod search;

pub use error::error_page;
pub use search::{search_page, SearchPageVm};
