//! Core types for Fake Store.

pub mod catalog;
pub mod id;

pub use catalog::CatalogItem;
pub use id::*;
