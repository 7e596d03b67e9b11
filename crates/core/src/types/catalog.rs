//! Catalog item records as served by the remote store API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A purchasable product from the remote catalog.
///
/// Catalog items are read-only from the storefront's point of view: they are
/// deserialized from the catalog API response and copied into cart line items,
/// never mutated. Unknown upstream fields (such as `rating`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    pub category: String,
    pub description: String,
    /// Absolute URL of the product image.
    pub image: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub title: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_payload() {
        let json = r#"[
            {
                "id": 1,
                "title": "Fjallraven - Foldsack No. 1 Backpack",
                "price": 109.95,
                "description": "Your perfect pack for everyday use",
                "category": "men's clothing",
                "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
                "rating": { "rate": 3.9, "count": 120 }
            },
            {
                "id": 2,
                "title": "Mens Casual Slim Fit",
                "price": 22,
                "description": "Slim-fitting style",
                "category": "men's clothing",
                "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg"
            }
        ]"#;

        let items: Vec<CatalogItem> = serde_json::from_str(json).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ProductId::new(1));
        assert_eq!(items[0].price, Decimal::new(10995, 2));
        assert_eq!(items[0].category, "men's clothing");
        assert_eq!(items[1].price, Decimal::new(22, 0));
    }

    #[test]
    fn test_deserialize_rejects_missing_fields() {
        let json = r#"{ "id": 3, "title": "No price" }"#;
        assert!(serde_json::from_str::<CatalogItem>(json).is_err());
    }
}
