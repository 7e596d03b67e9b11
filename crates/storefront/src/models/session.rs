//! Session-related types.

/// Session keys for visitor state.
pub mod keys {
    /// Key for storing the visitor's cart.
    pub const CART: &str = "cart";
}
