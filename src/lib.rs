//! Core library for the catalog service.
//!
//! This crate keeps a bounded-depth category tree (levels 0 through 3)
//! well-formed under mutation and validates every product's category binding.
//! Persistence goes through a Diesel/SQLite repository injected by the
//! caller; HTTP routing and response shaping live outside this crate and
//! consume the `repository` traits.

pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod schema;
