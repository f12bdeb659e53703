//! Order-message composition and the WhatsApp handoff link.
//!
//! The composed text is the customer-facing order summary handed to the
//! WhatsApp thread for confirmation. It is deterministic: same order, same
//! message, byte for byte.

use std::fmt::Write as _;

use smokehaus_core::{format_rupees, format_rupees_fixed};

use crate::cart::CartItem;
use crate::models::DeliveryDetails;
use crate::pricing::BillingBreakdown;
use crate::services::orders::OrderResult;

/// Closing instruction appended to every order message.
const CONFIRMATION_LINE: &str = "Reply to this message to confirm your order.";

/// Render the cart and billing breakdown into the WhatsApp order message.
///
/// Sections: header with the short order ID, customer block, one line per
/// cart item in cart order (`{qty}x {name} ({variant}) - ₹{line_total}`),
/// billing block (delivery shows the literal `FREE` when it bills zero),
/// grand total, and the confirmation instruction.
#[must_use]
pub fn compose_order_message(
    order: &OrderResult,
    details: &DeliveryDetails,
    items: &[CartItem],
    billing: &BillingBreakdown,
) -> String {
    let mut message = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(message, "*Smokehaus Order #{}*", order.short_id());
    let _ = writeln!(message);
    let _ = writeln!(message, "*Customer*");
    let _ = writeln!(message, "Name: {}", details.name);
    let _ = writeln!(message, "Phone: {}", details.mobile);
    let _ = writeln!(message, "Address: {}", details.address);
    let _ = writeln!(message);

    let _ = writeln!(message, "*Items*");
    for item in items {
        let _ = match &item.variant {
            Some(variant) => writeln!(
                message,
                "{}x {} ({variant}) - {}",
                item.quantity,
                item.name,
                format_rupees(item.line_total())
            ),
            None => writeln!(
                message,
                "{}x {} - {}",
                item.quantity,
                item.name,
                format_rupees(item.line_total())
            ),
        };
    }
    let _ = writeln!(message);

    let delivery = if billing.billed_delivery_fee().is_zero() {
        "FREE".to_string()
    } else {
        format_rupees(billing.billed_delivery_fee())
    };

    let _ = writeln!(message, "*Billing*");
    let _ = writeln!(message, "Subtotal: {}", format_rupees(billing.subtotal));
    let _ = writeln!(message, "Tax (18%): {}", format_rupees(billing.tax));
    let _ = writeln!(message, "Delivery: {delivery}");
    let _ = writeln!(
        message,
        "*TOTAL: {}*",
        format_rupees_fixed(billing.grand_total())
    );
    let _ = writeln!(message);
    message.push_str(CONFIRMATION_LINE);

    message
}

/// Build the `wa.me` deep link carrying the composed message.
///
/// The message is percent-encoded as the single `text` parameter. The link
/// is a one-way handoff; nothing confirms back from it.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use smokehaus_core::{OrderId, ProductId, VariantId};

    use crate::cart::ItemKind;

    use super::*;

    fn item(id: &str, price: rust_decimal::Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            variant_id: VariantId::new(id),
            name: id.to_string(),
            image: String::new(),
            kind: ItemKind::Product,
            price: format!("₹{price}"),
            price_value: price,
            quantity,
            variant: None,
        }
    }

    fn details() -> DeliveryDetails {
        DeliveryDetails {
            name: "Asha".to_string(),
            mobile: "9812345678".to_string(),
            address: "Road No. 1, Banjara Hills".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_scenario_brisket_message() {
        // Cart of one brisket at 500: tax 90, no fee calculated, total 590.
        let order = OrderResult {
            id: OrderId::new("ab12cd34-xyz"),
        };
        let items = vec![item("brisket", dec!(500), 1)];
        let billing = BillingBreakdown::compute(dec!(500), None);

        let message = compose_order_message(&order, &details(), &items, &billing);

        assert!(message.contains("Order #AB12CD34"));
        assert!(message.contains("1x brisket - ₹500"));
        assert!(message.contains("Delivery: FREE"));
        assert!(message.contains("*TOTAL: ₹590.00*"));
        assert!(message.ends_with(CONFIRMATION_LINE));
    }

    #[test]
    fn test_every_line_rendered_once_in_cart_order() {
        let order = OrderResult {
            id: OrderId::new("ab12cd34-xyz"),
        };
        let items = vec![
            item("brisket", dec!(500), 1),
            item("wings", dec!(180), 2),
            item("ribs", dec!(650), 1),
        ];
        let subtotal = items.iter().map(CartItem::line_total).sum();
        let billing = BillingBreakdown::compute(subtotal, Some(dec!(100)));

        let message = compose_order_message(&order, &details(), &items, &billing);

        let brisket = message.find("1x brisket - ₹500").unwrap();
        let wings = message.find("2x wings - ₹360").unwrap();
        let ribs = message.find("1x ribs - ₹650").unwrap();
        assert!(brisket < wings && wings < ribs);
        assert_eq!(message.matches("brisket").count(), 1);
    }

    #[test]
    fn test_variant_label_in_parentheses() {
        let order = OrderResult {
            id: OrderId::new("ab12cd34-xyz"),
        };
        let mut half = item("wings", dec!(180), 1);
        half.variant = Some("half".to_string());
        let billing = BillingBreakdown::compute(dec!(180), None);

        let message = compose_order_message(&order, &details(), &[half], &billing);
        assert!(message.contains("1x wings (half) - ₹180"));
    }

    #[test]
    fn test_nonzero_fee_renders_amount() {
        let order = OrderResult {
            id: OrderId::new("ab12cd34-xyz"),
        };
        let items = vec![item("brisket", dec!(500), 1)];
        let billing = BillingBreakdown::compute(dec!(500), Some(dec!(100)));

        let message = compose_order_message(&order, &details(), &items, &billing);
        assert!(message.contains("Delivery: ₹100"));
        assert!(message.contains("*TOTAL: ₹690.00*"));
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link("919812345678", "*Order #AB12CD34*\nTotal ₹590");

        assert!(link.starts_with("https://wa.me/919812345678?text="));
        // Encoded as a single parameter: no raw spaces, newlines, or '*'.
        let query = link.split_once("?text=").unwrap().1;
        assert!(!query.contains(' '));
        assert!(!query.contains('\n'));
        assert!(query.contains("%0A"));
        assert!(query.contains("%2A"));
    }
}
