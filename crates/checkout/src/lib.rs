//! Smokehaus checkout library.
//!
//! This crate owns everything between "add to cart" and "order placed":
//!
//! - [`cart`] - the persisted cart store and its item types
//! - [`pricing`] - haversine distance, the delivery-fee policy, and billing
//! - [`geo`] - geolocation and reverse-geocode adapters
//! - [`services`] - the order submission and invoice API client
//! - [`message`] - the WhatsApp order-message composer
//! - [`checkout`] - the `CheckoutFlow` state machine sequencing the above
//!
//! The presentation layer (out of tree) drives [`checkout::CheckoutFlow`]
//! and renders its states; nothing in this crate draws UI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod geo;
pub mod message;
pub mod models;
pub mod pricing;
pub mod services;
