//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-owned cart state driven by the core reducer

pub mod cart;

pub use cart::SessionCart;
