//! Cart line items and the persisted cart store.
//!
//! The cart is client-local, single-user state: an insertion-ordered list of
//! line items persisted to a namespaced JSON file. See [`store::CartStore`]
//! for the mutation and persistence contract.

mod store;

pub use store::{CartStore, CartStoreError, QuantityChange};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokehaus_core::{ProductId, VariantId};

/// Category discriminator carried into the order payload.
///
/// Single products and bundled combos are priced the same way but billed
/// under different categories by the order backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Combo,
}

/// A catalog entry as handed to the cart by the product/content service.
///
/// This is the full contract the cart consumes from the catalog: identity,
/// display fields, and the authoritative numeric price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Line-item addressing identity. Equals `id` for single-variant
    /// products; distinct once size/flavor variants exist.
    pub variant_id: VariantId,
    pub name: String,
    pub image: String,
    pub kind: ItemKind,
    /// Currency-formatted display string. Never parsed back into a number.
    pub price: String,
    /// Authoritative numeric price for all arithmetic.
    pub price_value: Decimal,
    /// Optional variant label, e.g. a size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// One distinct line in the cart with an aggregated quantity.
///
/// Invariant: `quantity >= 1` while the item is present; reaching zero
/// removes the line from the cart entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub variant_id: VariantId,
    pub name: String,
    pub image: String,
    pub kind: ItemKind,
    pub price: String,
    pub price_value: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CartItem {
    /// Total for this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_value * Decimal::from(self.quantity)
    }
}

impl From<Product> for CartItem {
    /// A freshly added product enters the cart with quantity 1.
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            variant_id: product.variant_id,
            name: product.name,
            image: product.image,
            kind: product.kind,
            price: product.price,
            price_value: product.price_value,
            quantity: 1,
            variant: product.variant,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn brisket() -> Product {
        Product {
            id: ProductId::new("brisket"),
            variant_id: VariantId::new("brisket"),
            name: "brisket".to_string(),
            image: "https://cdn.smokehaus.in/brisket.webp".to_string(),
            kind: ItemKind::Product,
            price: "₹500".to_string(),
            price_value: dec!(500),
            variant: None,
        }
    }

    #[test]
    fn test_product_enters_cart_with_quantity_one() {
        let item = CartItem::from(brisket());
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total(), dec!(500));
    }

    #[test]
    fn test_line_total_scales_with_quantity() {
        let mut item = CartItem::from(brisket());
        item.quantity = 3;
        assert_eq!(item.line_total(), dec!(1500));
    }

    #[test]
    fn test_item_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ItemKind::Product).unwrap(),
            "\"product\""
        );
        assert_eq!(serde_json::to_string(&ItemKind::Combo).unwrap(), "\"combo\"");
    }
}
