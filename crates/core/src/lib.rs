//! Fake Store Core - Catalog types and the cart reducer.
//!
//! This crate holds the only real business logic of the storefront: the
//! rules that move a shopping cart from one state to the next.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session handling. The storefront binary owns a [`Cart`] per
//! visitor session and replaces it with the reducer's return value on every
//! add/remove event.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the catalog item record
//! - [`cart`] - Cart line items, the [`Cart`] collection, and the reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartEvent, CartLineItem, add, reduce, remove, total_count};
pub use types::*;
