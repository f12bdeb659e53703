//! Core types for Smokehaus.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, VariantId};
pub use money::{format_rupees, format_rupees_fixed, round2, round_whole};
