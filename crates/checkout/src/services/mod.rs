//! Remote service clients for checkout.
//!
//! # Services
//!
//! - `orders` - Order submission and invoice dispatch against the order API

pub mod orders;
