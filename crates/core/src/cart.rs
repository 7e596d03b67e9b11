//! Shopping cart state and the pure reducer that drives it.
//!
//! A [`Cart`] is an ordered, id-unique sequence of [`CartLineItem`]s. Every
//! line item holds at least one unit: a line whose amount would drop to zero
//! is removed instead of being kept around empty.
//!
//! The cart is never mutated in place. [`add`] and [`remove`] take the current
//! cart by reference and return the next one, which the owner (the visitor's
//! session in the storefront) stores wholesale:
//!
//! ```rust
//! use fake_store_core::{Cart, CartEvent, ProductId, reduce, total_count};
//! # use fake_store_core::CatalogItem;
//! # let backpack: CatalogItem = serde_json::from_str(
//! #     r#"{"id":1,"category":"bags","description":"","image":"","price":109.95,"title":"Backpack"}"#,
//! # ).unwrap();
//!
//! let cart = Cart::new();
//! let cart = reduce(&cart, &CartEvent::Add(backpack.clone()));
//! let cart = reduce(&cart, &CartEvent::Add(backpack));
//! assert_eq!(total_count(&cart), 2);
//!
//! let cart = reduce(&cart, &CartEvent::Remove(ProductId::new(1)));
//! assert_eq!(total_count(&cart), 1);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CatalogItem, ProductId};

/// Errors raised when a cart is rebuilt from untrusted data (e.g. session storage).
///
/// The reducer itself never fails; these only guard deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart line for product {0} has a zero amount")]
    ZeroAmount(ProductId),
    #[error("cart contains more than one line for product {0}")]
    DuplicateItem(ProductId),
}

// =============================================================================
// CartLineItem
// =============================================================================

/// A catalog item annotated with how many units of it are in the cart.
///
/// Serialized flat: the catalog fields followed by `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    item: CatalogItem,
    amount: u32,
}

impl CartLineItem {
    /// A fresh line holding a single unit of `item`.
    fn single(item: &CatalogItem) -> Self {
        Self {
            item: item.clone(),
            amount: 1,
        }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.item.id
    }

    /// Number of units in the cart (always at least 1).
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Unit price multiplied by amount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.amount)
    }

    fn incremented(&self) -> Self {
        Self {
            item: self.item.clone(),
            amount: self.amount.saturating_add(1),
        }
    }

    /// One unit fewer, or `None` when this was the last unit.
    fn decremented(&self) -> Option<Self> {
        (self.amount > 1).then(|| Self {
            item: self.item.clone(),
            amount: self.amount - 1,
        })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The ordered, id-unique collection of line items a visitor has selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        for (index, line) in lines.iter().enumerate() {
            if line.amount == 0 {
                return Err(CartError::ZeroAmount(line.id()));
            }
            if lines.iter().skip(index + 1).any(|other| other.id() == line.id()) {
                return Err(CartError::DuplicateItem(line.id()));
            }
        }

        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// An event that moves the cart to its next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The visitor clicked "add to cart" on a catalog item.
    Add(CatalogItem),
    /// The visitor removed one unit of a product.
    Remove(ProductId),
}

/// Add one unit of `clicked` to the cart.
///
/// Increments the existing line for the product, or appends a new line with
/// an amount of 1. Other lines and their order are untouched.
#[must_use]
pub fn add(cart: &Cart, clicked: &CatalogItem) -> Cart {
    if !cart.contains(clicked.id) {
        let mut lines = cart.lines.clone();
        lines.push(CartLineItem::single(clicked));
        return Cart { lines };
    }

    Cart {
        lines: cart
            .lines
            .iter()
            .map(|line| {
                if line.id() == clicked.id {
                    line.incremented()
                } else {
                    line.clone()
                }
            })
            .collect(),
    }
}

/// Remove one unit of product `id` from the cart.
///
/// A line holding a single unit is dropped entirely. Unknown ids leave the
/// cart unchanged.
#[must_use]
pub fn remove(cart: &Cart, id: ProductId) -> Cart {
    Cart {
        lines: cart
            .lines
            .iter()
            .filter_map(|line| {
                if line.id() == id {
                    line.decremented()
                } else {
                    Some(line.clone())
                }
            })
            .collect(),
    }
}

/// Total number of units across all lines (0 for an empty cart).
#[must_use]
pub fn total_count(cart: &Cart) -> u64 {
    cart.lines.iter().map(|line| u64::from(line.amount)).sum()
}

/// Apply a single event to the cart.
#[must_use]
pub fn reduce(cart: &Cart, event: &CartEvent) -> Cart {
    match event {
        CartEvent::Add(item) => add(cart, item),
        CartEvent::Remove(id) => remove(cart, *id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn item(id: i32) -> CatalogItem {
        CatalogItem {
            id: ProductId::new(id),
            category: "electronics".to_string(),
            description: format!("Product number {id}"),
            image: format!("https://fakestoreapi.com/img/{id}.jpg"),
            price: Decimal::new(i64::from(id) * 1000 + 99, 2),
            title: format!("Product {id}"),
        }
    }

    /// Build a cart by adding each `(id, amount)` pair in order.
    fn cart_of(entries: &[(i32, u32)]) -> Cart {
        entries.iter().fold(Cart::new(), |cart, &(id, amount)| {
            (0..amount).fold(cart, |cart, _| add(&cart, &item(id)))
        })
    }

    fn snapshot(cart: &Cart) -> Vec<(i32, u32)> {
        cart.lines()
            .iter()
            .map(|line| (line.id().as_i32(), line.amount()))
            .collect()
    }

    // =========================================================================
    // add
    // =========================================================================

    #[test]
    fn test_add_new_item_appends_single_unit() {
        let cart = cart_of(&[(1, 2), (2, 1)]);

        let next = add(&cart, &item(3));

        assert_eq!(next.len(), cart.len() + 1);
        assert_eq!(snapshot(&next), vec![(1, 2), (2, 1), (3, 1)]);
        assert_eq!(next.get(ProductId::new(3)).unwrap().item(), &item(3));
    }

    #[test]
    fn test_add_existing_item_increments_amount() {
        let cart = cart_of(&[(1, 1), (2, 3), (3, 1)]);

        let next = add(&cart, &item(2));

        assert_eq!(next.len(), cart.len());
        assert_eq!(snapshot(&next), vec![(1, 1), (2, 4), (3, 1)]);
    }

    #[test]
    fn test_add_does_not_mutate_input() {
        let cart = cart_of(&[(1, 1)]);
        let before = cart.clone();

        let _ = add(&cart, &item(1));
        let _ = add(&cart, &item(2));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_saturates_at_max_amount() {
        let line = CartLineItem {
            item: item(1),
            amount: u32::MAX,
        };
        let cart = Cart::try_from(vec![line]).unwrap();

        let next = add(&cart, &item(1));

        assert_eq!(next.get(ProductId::new(1)).unwrap().amount(), u32::MAX);
    }

    // =========================================================================
    // remove
    // =========================================================================

    #[test]
    fn test_remove_last_unit_drops_line() {
        let cart = cart_of(&[(1, 2), (2, 1), (3, 5)]);

        let next = remove(&cart, ProductId::new(2));

        assert_eq!(next.len(), cart.len() - 1);
        assert!(!next.contains(ProductId::new(2)));
        assert_eq!(snapshot(&next), vec![(1, 2), (3, 5)]);
    }

    #[test]
    fn test_remove_decrements_amount() {
        let cart = cart_of(&[(1, 3), (2, 1)]);

        let next = remove(&cart, ProductId::new(1));

        assert_eq!(next.len(), cart.len());
        assert_eq!(snapshot(&next), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let cart = cart_of(&[(1, 2), (2, 1)]);

        assert_eq!(remove(&cart, ProductId::new(99)), cart);
        assert_eq!(remove(&Cart::new(), ProductId::new(1)), Cart::new());
    }

    #[test]
    fn test_remove_repeatedly_until_absent_then_noop() {
        let cart = cart_of(&[(1, 1), (2, 4)]);
        let id = ProductId::new(2);

        let emptied = (0..4).fold(cart, |cart, _| remove(&cart, id));
        assert!(!emptied.contains(id));
        assert_eq!(snapshot(&emptied), vec![(1, 1)]);

        assert_eq!(remove(&emptied, id), emptied);
    }

    // =========================================================================
    // total_count / subtotal
    // =========================================================================

    #[test]
    fn test_total_count_empty_cart() {
        assert_eq!(total_count(&Cart::new()), 0);
    }

    #[test]
    fn test_total_count_sums_amounts() {
        let cart = cart_of(&[(1, 2), (2, 1), (3, 4)]);
        assert_eq!(total_count(&cart), 7);
    }

    #[test]
    fn test_subtotal() {
        // item(1) = 10.99, item(2) = 20.99
        let cart = cart_of(&[(1, 2), (2, 1)]);
        assert_eq!(cart.subtotal(), Decimal::new(4297, 2));
        assert_eq!(Cart::new().subtotal(), Decimal::ZERO);
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[test]
    fn test_scenario_add_same_item_twice() {
        let cart = Cart::new();
        let cart = add(&cart, &item(1));
        assert_eq!(snapshot(&cart), vec![(1, 1)]);

        let cart = add(&cart, &item(1));
        assert_eq!(snapshot(&cart), vec![(1, 2)]);
        assert_eq!(total_count(&cart), 2);
    }

    #[test]
    fn test_scenario_remove_single_unit_item() {
        let cart = cart_of(&[(1, 2), (2, 1)]);

        let cart = remove(&cart, ProductId::new(2));

        assert_eq!(snapshot(&cart), vec![(1, 2)]);
        assert_eq!(total_count(&cart), 2);
    }

    #[test]
    fn test_scenario_remove_only_item_empties_cart() {
        let cart = cart_of(&[(1, 1)]);

        let cart = remove(&cart, ProductId::new(1));

        assert!(cart.is_empty());
        assert_eq!(total_count(&cart), 0);
    }

    #[test]
    fn test_reduce_dispatches_events() {
        let cart = reduce(&Cart::new(), &CartEvent::Add(item(5)));
        assert_eq!(snapshot(&cart), vec![(5, 1)]);

        let cart = reduce(&cart, &CartEvent::Remove(ProductId::new(5)));
        assert!(cart.is_empty());
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_cart_serializes_as_flat_line_items() {
        let cart = cart_of(&[(1, 2)]);

        let json = serde_json::to_value(&cart).unwrap();

        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["title"], "Product 1");
        assert_eq!(json[0]["amount"], 2);
        assert_eq!(serde_json::from_value::<Cart>(json).unwrap(), cart);
    }

    #[test]
    fn test_deserialize_rejects_zero_amount() {
        let mut json = serde_json::to_value(cart_of(&[(1, 1)])).unwrap();
        json[0]["amount"] = 0.into();

        let err = serde_json::from_value::<Cart>(json).unwrap_err();
        assert!(err.to_string().contains("zero amount"));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_lines() {
        let line = serde_json::to_value(cart_of(&[(1, 1)])).unwrap()[0].clone();
        let json = serde_json::Value::Array(vec![line.clone(), line]);

        let err = serde_json::from_value::<Cart>(json).unwrap_err();
        assert!(err.to_string().contains("more than one line"));
    }

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            CartError::ZeroAmount(ProductId::new(4)).to_string(),
            "cart line for product 4 has a zero amount"
        );
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn event_strategy() -> impl Strategy<Value = CartEvent> {
        prop_oneof![
            (1i32..6).prop_map(|id| CartEvent::Add(item(id))),
            (0i32..7).prop_map(|id| CartEvent::Remove(ProductId::new(id))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any event sequence keeps ids unique, amounts positive, and
        /// the cart in agreement with a simple per-product counter.
        #[test]
        fn cart_matches_counter_model(events in prop::collection::vec(event_strategy(), 0..64)) {
            let mut cart = Cart::new();
            let mut model: HashMap<ProductId, u32> = HashMap::new();

            for event in &events {
                cart = reduce(&cart, event);
                match event {
                    CartEvent::Add(item) => *model.entry(item.id).or_insert(0) += 1,
                    CartEvent::Remove(id) => {
                        if let Some(amount) = model.get_mut(id) {
                            *amount -= 1;
                            if *amount == 0 {
                                model.remove(id);
                            }
                        }
                    }
                }
            }

            prop_assert_eq!(cart.len(), model.len());
            for line in &cart {
                prop_assert!(line.amount() >= 1);
                prop_assert_eq!(Some(&line.amount()), model.get(&line.id()));
            }
            prop_assert_eq!(total_count(&cart), model.values().map(|&a| u64::from(a)).sum::<u64>());
        }

        /// Property: `remove` undoes `add` for any starting cart.
        #[test]
        fn remove_undoes_add(
            events in prop::collection::vec(event_strategy(), 0..32),
            id in 1i32..8,
        ) {
            let cart = events.iter().fold(Cart::new(), |cart, event| reduce(&cart, event));

            let round_trip = remove(&add(&cart, &item(id)), ProductId::new(id));

            prop_assert_eq!(round_trip, cart);
        }
    }
}
