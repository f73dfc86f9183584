pub mod codec;
pub mod controller;
pub mod filter;
pub mod matcher;
pub mod query;
pub mod results;
pub mod saved;
pub mod sort;
pub mod ui;

pub use controller::{NavigationPort, SearchController};
pub use saved::PersistentStore;

/// Listings per page, as served by the properties API.
pub const PAGE_SIZE: usize = 10;
