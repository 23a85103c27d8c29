//! Diesel row structs mirroring `schema.rs`, converted to domain types at the
//! repository boundary.

pub mod category;
pub mod product;
