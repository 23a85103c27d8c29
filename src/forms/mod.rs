//! Boundary payloads: raw caller input validated and converted into domain
//! values before reaching the repository.

pub mod categories;
pub mod products;
