//! Delivery-fee policy and billing breakdown.
//!
//! Everything here is pure: two coordinates and a subtotal in, money out.
//! All rounding goes through the shared helpers in `smokehaus-core`, so the
//! fee calculator and the billing display can never round differently.

use rust_decimal::Decimal;
use serde::Serialize;
use smokehaus_core::{round2, round_whole};

use crate::geo::Coordinates;

/// Mean Earth radius in kilometers, for the haversine distance.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Orders at or above this subtotal ship free.
pub const FREE_DELIVERY_THRESHOLD: u32 = 999;

/// Flat component of the delivery fee, in rupees.
pub const BASE_DELIVERY_FEE: i64 = 55;

/// Per-kilometer component of the delivery fee, in rupees.
pub const FEE_PER_KM: i64 = 15;

/// GST rate applied to the subtotal (18%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(18, 2)
}

/// Great-circle distance between two coordinates, in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Delivery fee for an order, in whole rupees.
///
/// Subtotals at or above [`FREE_DELIVERY_THRESHOLD`] ship free. Below it the
/// fee is `55 + ceil(distance_km) * 15`: any fractional kilometer is billed
/// as a full one. The `ceil` before the multiply is pricing policy, not an
/// approximation, and must not be "fixed" to a rounder distance.
#[must_use]
pub fn delivery_fee(store: Coordinates, user: Coordinates, subtotal: Decimal) -> Decimal {
    if subtotal >= Decimal::from(FREE_DELIVERY_THRESHOLD) {
        return Decimal::ZERO;
    }

    let distance_km = haversine_km(store, user);
    #[allow(clippy::cast_possible_truncation)] // delivery distances are tiny relative to i64
    let billable_km = distance_km.ceil() as i64;

    round_whole(Decimal::from(BASE_DELIVERY_FEE + billable_km * FEE_PER_KM))
}

/// Tax on a subtotal: `round2(subtotal * 18%)`.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    round2(subtotal * tax_rate())
}

/// Derived billing figures for a cart. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingBreakdown {
    /// Sum of `price_value * quantity` across all lines.
    pub subtotal: Decimal,
    /// GST at 18% of the subtotal.
    pub tax: Decimal,
    /// `None` until the fee sub-flow has produced a value. An absent fee
    /// bills as zero; the distinction only matters for display.
    pub delivery_fee: Option<Decimal>,
}

impl BillingBreakdown {
    /// Build a breakdown from a subtotal and an optionally calculated fee.
    #[must_use]
    pub fn compute(subtotal: Decimal, delivery_fee: Option<Decimal>) -> Self {
        Self {
            subtotal,
            tax: tax(subtotal),
            delivery_fee,
        }
    }

    /// The fee that actually bills: zero when never calculated.
    #[must_use]
    pub fn billed_delivery_fee(&self) -> Decimal {
        self.delivery_fee.unwrap_or(Decimal::ZERO)
    }

    /// Final payable amount: subtotal + tax + billed delivery fee.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.subtotal + self.tax + self.billed_delivery_fee()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const STORE: Coordinates = Coordinates {
        lat: 17.4126,
        lng: 78.4448,
    };

    /// A point ~2.22 km due north of the store (0.02 deg of latitude).
    const NEARBY: Coordinates = Coordinates {
        lat: 17.4326,
        lng: 78.4448,
    };

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert!(haversine_km(STORE, STORE).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // One degree of latitude is ~111.195 km on a 6371 km sphere.
        let a = Coordinates { lat: 0.0, lng: 0.0 };
        let b = Coordinates { lat: 1.0, lng: 0.0 };
        let d = haversine_km(a, b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let d1 = haversine_km(STORE, NEARBY);
        let d2 = haversine_km(NEARBY, STORE);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_fee_bills_fractional_km_as_full() {
        // ~2.22 km away: ceil to 3, so 55 + 3 * 15 = 100.
        let d = haversine_km(STORE, NEARBY);
        assert!(d > 2.0 && d < 3.0, "distance drifted: {d}");
        assert_eq!(delivery_fee(STORE, NEARBY, dec!(500)), dec!(100));
    }

    #[test]
    fn test_fee_at_zero_distance_is_base() {
        // ceil(0) = 0 billable kilometers, leaving only the flat component.
        assert_eq!(delivery_fee(STORE, STORE, dec!(500)), dec!(55));
    }

    #[test]
    fn test_free_delivery_threshold() {
        assert_eq!(delivery_fee(STORE, NEARBY, dec!(999)), Decimal::ZERO);
        assert_eq!(delivery_fee(STORE, NEARBY, dec!(1500)), Decimal::ZERO);
        assert_eq!(delivery_fee(STORE, NEARBY, dec!(998)), dec!(100));
    }

    #[test]
    fn test_tax_is_deterministic() {
        assert_eq!(tax(dec!(500)), dec!(90));
        assert_eq!(tax(dec!(999)), dec!(179.82));
        // Half-away-from-zero at the paise boundary.
        assert_eq!(tax(dec!(100.25)), dec!(18.05));
    }

    #[test]
    fn test_grand_total_with_fee() {
        let billing = BillingBreakdown::compute(dec!(500), Some(dec!(100)));
        assert_eq!(billing.tax, dec!(90));
        assert_eq!(billing.grand_total(), dec!(690));
    }

    #[test]
    fn test_grand_total_without_calculated_fee() {
        // An uncalculated fee bills as zero.
        let billing = BillingBreakdown::compute(dec!(500), None);
        assert_eq!(billing.billed_delivery_fee(), Decimal::ZERO);
        assert_eq!(billing.grand_total(), dec!(590));
    }
}
