//! The checkout state machine.
//!
//! [`CheckoutFlow`] sequences the full "place order" flow: readiness from
//! delivery details, the independent delivery-fee sub-flow, order
//! submission, the WhatsApp handoff, and the optional invoice-email
//! sub-flow. One flow instance exists per session and owns the cart store;
//! collaborators are injected at construction.
//!
//! Only submission and invoice failures surface to the user. Geolocation and
//! geocode failures degrade internally: checkout always remains reachable.

use rust_decimal::Decimal;
use smokehaus_core::{Email, VariantId};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartStore, CartStoreError, Product, QuantityChange};
use crate::config::CheckoutConfig;
use crate::geo::{Coordinates, PositionOutcome, PositionProvider, ReverseGeocoder};
use crate::message::{compose_order_message, whatsapp_link};
use crate::models::DeliveryDetails;
use crate::pricing::{self, BillingBreakdown};
use crate::services::orders::{InvoiceError, OrderClient, OrderResult, SubmissionError};

/// Main checkout progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Delivery details incomplete; submission not yet allowed.
    Idle,
    /// Name, mobile, and address are all filled in.
    Ready,
    /// An order submission is in flight.
    Submitting,
    /// The order was placed. Terminal for this cart session.
    Succeeded(OrderResult),
}

/// Delivery-fee sub-flow. Runs independently and never gates readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeState {
    NotCalculated,
    Calculating,
    Calculated(Decimal),
    /// Position was denied or unavailable; fee stays uncalculated.
    Errored,
}

/// Invoice-email sub-flow, only meaningful after a successful order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceState {
    Idle,
    Sending,
    /// Terminal: one invoice per order.
    Sent,
}

/// Everything the presentation layer needs after a successful placement.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: OrderResult,
    /// The composed order summary.
    pub message: String,
    /// `wa.me` deep link carrying the summary, to open in a new context.
    pub whatsapp_url: String,
}

/// Errors from [`CheckoutFlow::place_order`].
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error("Delivery details are incomplete")]
    NotReady,
    #[error("The cart is empty")]
    EmptyCart,
    #[error("An order is already being submitted")]
    AlreadySubmitting,
    #[error("This cart has already been checked out")]
    AlreadyCompleted,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Errors from [`CheckoutFlow::email_invoice`].
#[derive(Debug, Error)]
pub enum InvoiceSendError {
    #[error("No completed order to invoice")]
    NoOrder,
    #[error("The invoice for this order has already been sent")]
    AlreadySent,
    #[error(transparent)]
    Invoice(#[from] InvoiceError),
}

/// The checkout orchestrator for one cart session.
pub struct CheckoutFlow<P> {
    cart: CartStore,
    details: DeliveryDetails,
    state: CheckoutState,
    fee: FeeState,
    invoice: InvoiceState,
    orders: OrderClient,
    geocoder: ReverseGeocoder,
    positions: P,
    store_location: Coordinates,
    whatsapp_number: String,
    fallback_area: Option<String>,
}

impl<P: PositionProvider> CheckoutFlow<P> {
    /// Build a flow from configuration, an opened cart store, and a
    /// position provider.
    #[must_use]
    pub fn new(config: &CheckoutConfig, cart: CartStore, positions: P) -> Self {
        Self {
            cart,
            details: DeliveryDetails::default(),
            state: CheckoutState::Idle,
            fee: FeeState::NotCalculated,
            invoice: InvoiceState::Idle,
            orders: OrderClient::new(&config.api_base),
            geocoder: ReverseGeocoder::new(&config.geocoder_base),
            positions,
            store_location: config.store_location,
            whatsapp_number: config.whatsapp_number.clone(),
            fallback_area: config.fallback_area.clone(),
        }
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    #[must_use]
    pub const fn fee_state(&self) -> &FeeState {
        &self.fee
    }

    #[must_use]
    pub const fn invoice_state(&self) -> &InvoiceState {
        &self.invoice
    }

    #[must_use]
    pub const fn details(&self) -> &DeliveryDetails {
        &self.details
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Current billing figures for display: cart subtotal plus whatever the
    /// fee sub-flow has produced so far.
    #[must_use]
    pub fn billing(&self) -> BillingBreakdown {
        BillingBreakdown::compute(self.cart.subtotal(), self.calculated_fee())
    }

    const fn calculated_fee(&self) -> Option<Decimal> {
        match self.fee {
            FeeState::Calculated(fee) => Some(fee),
            _ => None,
        }
    }

    /// Whether the cart may still be edited. Edits are disabled once a
    /// submission starts and stay disabled after success.
    #[must_use]
    pub const fn cart_editable(&self) -> bool {
        matches!(self.state, CheckoutState::Idle | CheckoutState::Ready)
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add a product to the cart. Ignored once checkout has started.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn add_item(&mut self, product: Product) -> Result<(), CartStoreError> {
        if !self.cart_editable() {
            return Ok(());
        }
        self.cart.add_item(product)
    }

    /// Remove a cart line. Ignored once checkout has started.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn remove_item(&mut self, variant_id: &VariantId) -> Result<(), CartStoreError> {
        if !self.cart_editable() {
            return Ok(());
        }
        self.cart.remove_item(variant_id)
    }

    /// Step a line's quantity. Ignored once checkout has started.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn update_quantity(
        &mut self,
        variant_id: &VariantId,
        change: QuantityChange,
    ) -> Result<(), CartStoreError> {
        if !self.cart_editable() {
            return Ok(());
        }
        self.cart.update_quantity(variant_id, change)
    }

    /// Dismiss the cart drawer.
    pub const fn close_cart(&mut self) {
        self.cart.close();
    }

    // =========================================================================
    // Delivery details
    // =========================================================================

    /// Replace the delivery details and re-evaluate readiness.
    ///
    /// Called on every field edit; `Idle` and `Ready` flip back and forth as
    /// the required fields fill and empty.
    pub fn set_details(&mut self, details: DeliveryDetails) {
        self.details = details;
        self.refresh_readiness();
    }

    fn refresh_readiness(&mut self) {
        if matches!(self.state, CheckoutState::Idle | CheckoutState::Ready) {
            self.state = if self.details.is_complete() {
                CheckoutState::Ready
            } else {
                CheckoutState::Idle
            };
        }
    }

    // =========================================================================
    // Delivery-fee sub-flow
    // =========================================================================

    /// Run the delivery-fee sub-flow.
    ///
    /// Requests a position (which may suspend behind a permission prompt),
    /// computes the fee from the current subtotal, and best-effort pre-fills
    /// an empty address field from the reverse geocoder or the configured
    /// fallback area. Denied or unsupported geolocation degrades to
    /// [`FeeState::Errored`]; checkout proceeds with the fee billing zero.
    #[instrument(skip(self))]
    pub async fn calculate_delivery_fee(&mut self) -> &FeeState {
        if matches!(self.fee, FeeState::Calculating) {
            return &self.fee;
        }
        self.fee = FeeState::Calculating;

        match self.positions.request_position().await {
            PositionOutcome::Position(position) => {
                let fee =
                    pricing::delivery_fee(self.store_location, position, self.cart.subtotal());
                self.fee = FeeState::Calculated(fee);
                info!(fee = %fee, "delivery fee calculated");

                if self.details.address.trim().is_empty() {
                    let area = match self.geocoder.resolve_area(position).await {
                        Some(area) => Some(area),
                        None => self.fallback_area.clone(),
                    };
                    if let Some(area) = area {
                        self.details.address = area;
                        self.refresh_readiness();
                    }
                }
            }
            PositionOutcome::Denied => {
                warn!("geolocation denied, fee stays uncalculated");
                self.fee = FeeState::Errored;
                self.prefill_fallback_area();
            }
            PositionOutcome::Unsupported => {
                warn!("geolocation unsupported on this platform");
                self.fee = FeeState::Errored;
                self.prefill_fallback_area();
            }
        }

        &self.fee
    }

    fn prefill_fallback_area(&mut self) {
        if self.details.address.trim().is_empty()
            && let Some(area) = self.fallback_area.clone()
        {
            self.details.address = area;
            self.refresh_readiness();
        }
    }

    // =========================================================================
    // Order placement
    // =========================================================================

    /// Place the order.
    ///
    /// Snapshots the cart and billing at entry, submits, and on success
    /// composes the WhatsApp handoff, clears the cart, and transitions to
    /// `Succeeded`. On failure the cart and entered details are preserved
    /// and the state returns to `Ready` for a manual retry; nothing retries
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceOrderError`] when the flow is not in a submittable
    /// state or the submission itself fails.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<CheckoutOutcome, PlaceOrderError> {
        match self.state {
            CheckoutState::Idle => return Err(PlaceOrderError::NotReady),
            CheckoutState::Submitting => return Err(PlaceOrderError::AlreadySubmitting),
            CheckoutState::Succeeded(_) => return Err(PlaceOrderError::AlreadyCompleted),
            CheckoutState::Ready => {}
        }
        if self.cart.is_empty() {
            return Err(PlaceOrderError::EmptyCart);
        }

        self.state = CheckoutState::Submitting;

        // Snapshot: concurrent cart edits are disabled from here on, and the
        // submission reads this copy regardless.
        let items = self.cart.items().to_vec();
        let billing = self.billing();

        match self.orders.submit_order(&items, &self.details, &billing).await {
            Ok(order) => {
                let message = compose_order_message(&order, &self.details, &items, &billing);
                let whatsapp_url = whatsapp_link(&self.whatsapp_number, &message);

                // The order exists remotely; a failed local clear must not
                // turn success into failure.
                if let Err(e) = self.cart.clear() {
                    warn!(error = %e, "failed to clear cart after successful order");
                }

                info!(order_id = %order.id, short_id = %order.short_id(), "order placed");
                self.state = CheckoutState::Succeeded(order.clone());

                Ok(CheckoutOutcome {
                    order,
                    message,
                    whatsapp_url,
                })
            }
            Err(e) => {
                // Cart and details untouched; user may retry.
                self.state = CheckoutState::Ready;
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Invoice sub-flow
    // =========================================================================

    /// Request an emailed invoice for the completed order.
    ///
    /// Only available from `Succeeded`; a sent invoice is terminal for the
    /// order. On failure the sub-flow returns to `Idle` so the user may
    /// retry with a corrected email.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceSendError`] when there is no completed order, the
    /// invoice was already sent, or the dispatch fails.
    #[instrument(skip(self, email))]
    pub async fn email_invoice(&mut self, email: Email) -> Result<(), InvoiceSendError> {
        let CheckoutState::Succeeded(order) = &self.state else {
            return Err(InvoiceSendError::NoOrder);
        };
        if matches!(self.invoice, InvoiceState::Sent) {
            return Err(InvoiceSendError::AlreadySent);
        }

        let order_id = order.id.clone();
        self.invoice = InvoiceState::Sending;

        match self.orders.send_invoice(&order_id, &email).await {
            Ok(()) => {
                self.invoice = InvoiceState::Sent;
                Ok(())
            }
            Err(e) => {
                self.invoice = InvoiceState::Idle;
                Err(e.into())
            }
        }
    }
}
