//! Order API client: submission and invoice dispatch.
//!
//! Submission is never retried automatically. A failed attempt surfaces a
//! displayable [`SubmissionError`] and leaves the cart untouched so the user
//! can retry manually without risking duplicate orders.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokehaus_core::{Email, OrderId};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::cart::{CartItem, ItemKind};
use crate::models::DeliveryDetails;
use crate::pricing::BillingBreakdown;

/// Fixed payment-method label: settlement is deferred to cash on delivery or
/// the WhatsApp thread. No card data ever enters an order payload.
pub const PAYMENT_METHOD: &str = "cod-whatsapp";

/// Errors from order submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The order API could not be reached.
    #[error("Could not reach the order service: {0}")]
    Http(#[from] reqwest::Error),

    /// The order API rejected the order.
    #[error("Order was not accepted: {message}")]
    Api { status: u16, message: String },

    /// The order API returned an unreadable response.
    #[error("Order service returned an invalid response: {0}")]
    Parse(String),
}

/// Errors from invoice dispatch. The order itself remains completed.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The order API could not be reached.
    #[error("Could not reach the invoice service: {0}")]
    Http(#[from] reqwest::Error),

    /// The invoice request was rejected.
    #[error("Invoice could not be sent: {message}")]
    Api { status: u16, message: String },
}

/// A successfully created order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    /// Full identifier as returned by the order API.
    pub id: OrderId,
}

impl OrderResult {
    /// Short, human-facing order ID (see [`OrderId::short`]).
    #[must_use]
    pub fn short_id(&self) -> String {
        self.id.short()
    }
}

/// One normalized payload row per cart line.
#[derive(Debug, Serialize)]
struct OrderItemRow<'a> {
    name: &'a str,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    category: ItemKind,
}

/// The order creation request body.
#[derive(Debug, Serialize)]
struct OrderPayload<'a> {
    customer_name: &'a str,
    phone: &'a str,
    address: &'a str,
    items: Vec<OrderItemRow<'a>>,
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    payment_method: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct InvoiceRequest<'a> {
    email: &'a str,
}

/// Client for the order API.
///
/// Cheaply cloneable; the HTTP client and endpoint are shared via `Arc`.
#[derive(Clone)]
pub struct OrderClient {
    inner: Arc<OrderClientInner>,
}

struct OrderClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl OrderClient {
    /// Create a new order API client.
    #[must_use]
    pub fn new(api_base: &Url) -> Self {
        Self {
            inner: Arc::new(OrderClientInner {
                client: reqwest::Client::new(),
                api_base: api_base.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Submit an order.
    ///
    /// Cart lines are normalized into discriminated payload rows; the billing
    /// breakdown travels alongside them. An uncalculated delivery fee is
    /// submitted as zero.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError`] on network failure, a non-2xx response,
    /// or an unreadable response body. The attempt is not retried.
    #[instrument(skip_all, fields(item_count = items.len()))]
    pub async fn submit_order(
        &self,
        items: &[CartItem],
        details: &DeliveryDetails,
        billing: &BillingBreakdown,
    ) -> Result<OrderResult, SubmissionError> {
        let payload = OrderPayload {
            customer_name: &details.name,
            phone: &details.mobile,
            address: &details.address,
            items: items
                .iter()
                .map(|item| OrderItemRow {
                    name: &item.name,
                    quantity: item.quantity,
                    price: item.price_value,
                    category: item.kind,
                })
                .collect(),
            subtotal: billing.subtotal,
            tax_amount: billing.tax,
            delivery_fee: billing.billed_delivery_fee(),
            total_amount: billing.grand_total(),
            payment_method: PAYMENT_METHOD,
        };

        let response = self
            .inner
            .client
            .post(format!("{}/orders", self.inner.api_base))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| SubmissionError::Parse(e.to_string()))?;

        let order = OrderResult {
            id: OrderId::new(body.id),
        };
        info!(order_id = %order.id, "order submitted");
        Ok(order)
    }

    /// Ask the backend to email an invoice for a completed order.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError`] on network failure or a non-2xx response.
    #[instrument(skip(self, email), fields(order_id = %order_id))]
    pub async fn send_invoice(&self, order_id: &OrderId, email: &Email) -> Result<(), InvoiceError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/orders/{}/invoice",
                self.inner.api_base, order_id
            ))
            .json(&InvoiceRequest {
                email: email.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InvoiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!(order_id = %order_id, "invoice requested");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use smokehaus_core::{ProductId, VariantId};

    use super::*;

    #[test]
    fn test_payload_shape() {
        let items = vec![CartItem {
            id: ProductId::new("brisket"),
            variant_id: VariantId::new("brisket"),
            name: "brisket".to_string(),
            image: String::new(),
            kind: ItemKind::Product,
            price: "₹500".to_string(),
            price_value: dec!(500),
            quantity: 2,
            variant: None,
        }];
        let details = DeliveryDetails {
            name: "Asha".to_string(),
            mobile: "9812345678".to_string(),
            address: "Banjara Hills".to_string(),
            email: None,
        };
        let billing = BillingBreakdown::compute(dec!(1000), Some(dec!(0)));

        let payload = OrderPayload {
            customer_name: &details.name,
            phone: &details.mobile,
            address: &details.address,
            items: items
                .iter()
                .map(|item| OrderItemRow {
                    name: &item.name,
                    quantity: item.quantity,
                    price: item.price_value,
                    category: item.kind,
                })
                .collect(),
            subtotal: billing.subtotal,
            tax_amount: billing.tax,
            delivery_fee: billing.billed_delivery_fee(),
            total_amount: billing.grand_total(),
            payment_method: PAYMENT_METHOD,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["customer_name"], "Asha");
        assert_eq!(json["items"][0]["category"], "product");
        assert_eq!(json["items"][0]["price"], 500.0);
        assert_eq!(json["subtotal"], 1000.0);
        assert_eq!(json["tax_amount"], 180.0);
        assert_eq!(json["delivery_fee"], 0.0);
        assert_eq!(json["total_amount"], 1180.0);
        assert_eq!(json["payment_method"], "cod-whatsapp");
    }

    #[test]
    fn test_short_id_from_result() {
        let order = OrderResult {
            id: OrderId::new("ab12cd34-xyz"),
        };
        assert_eq!(order.short_id(), "AB12CD34");
    }
}
