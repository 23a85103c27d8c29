//! Domain entities and value objects, independent of persistence.

pub mod category;
pub mod product;
pub mod tree;
pub mod types;
