pub mod visitor;

pub use visitor::Visitor;
