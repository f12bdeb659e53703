//! Smokehaus Core - Shared types library.
//!
//! This crate provides common types used across all Smokehaus components:
//! - `checkout` - cart and checkout orchestration
//! - the presentation layer (out of tree)
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   shared money rounding/formatting helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
