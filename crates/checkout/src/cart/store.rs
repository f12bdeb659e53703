//! Persisted cart store.
//!
//! A single session owns the cart; there is no cross-tab coordination, so
//! two concurrent sessions writing the same file race and the last write
//! wins. That is a documented limitation of client-local storage, not a
//! defect to patch here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokehaus_core::VariantId;
use thiserror::Error;
use tracing::warn;

use super::{CartItem, Product};

/// Fixed namespace for the cart's storage entry.
const STORAGE_NAMESPACE: &str = "smokehaus.cart";

/// Schema version written into the storage envelope.
const STORAGE_VERSION: u32 = 1;

/// Errors from cart persistence.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Reading or writing the cart file failed.
    #[error("cart storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serializing the cart failed.
    #[error("cart serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Direction of a quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Increase,
    Decrease,
}

/// Versioned envelope around the stored item list.
///
/// The version tag exists so a future schema change can migrate old carts
/// instead of silently misreading them.
#[derive(Serialize, Deserialize)]
struct StoredCart {
    version: u32,
    items: Vec<CartItem>,
}

/// The persisted shopping cart.
///
/// Every mutation is written through to the cart file before the method
/// returns; reopening the store after a reload reconstructs the same list.
/// Mutations are synchronous, so call order is write order.
#[derive(Debug)]
pub struct CartStore {
    path: PathBuf,
    items: Vec<CartItem>,
    is_open: bool,
}

impl CartStore {
    /// Open the cart store, loading any previously persisted cart.
    ///
    /// A missing file yields an empty cart. A corrupt file or an unknown
    /// schema version also yields an empty cart (logged) rather than
    /// blocking the storefront on stale state.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// cart file exists but cannot be read.
    pub fn open(storage_dir: &Path) -> Result<Self, CartStoreError> {
        fs::create_dir_all(storage_dir)?;
        let path = storage_dir.join(format!("{STORAGE_NAMESPACE}.json"));

        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoredCart>(&raw) {
                Ok(stored) if stored.version == STORAGE_VERSION => stored.items,
                Ok(stored) => {
                    warn!(
                        version = stored.version,
                        "unknown cart schema version, starting empty"
                    );
                    Vec::new()
                }
                Err(e) => {
                    warn!(error = %e, "corrupt cart file, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            items,
            is_open: false,
        })
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Pre-tax, pre-delivery subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Whether the cart drawer should be shown. Display state only, never
    /// persisted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Dismiss the cart drawer.
    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Add a product to the cart.
    ///
    /// If a line with the same product `id` exists its quantity increments
    /// by one; otherwise a new line is appended with quantity 1. Also flags
    /// the cart drawer open.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails; the in-memory cart is
    /// not left ahead of the file.
    pub fn add_item(&mut self, product: Product) -> Result<(), CartStoreError> {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(CartItem::from(product)),
        }
        self.is_open = true;
        self.persist()
    }

    /// Remove the line with the given variant ID. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn remove_item(&mut self, variant_id: &VariantId) -> Result<(), CartStoreError> {
        let before = self.items.len();
        self.items.retain(|item| item.variant_id != *variant_id);
        if self.items.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Step a line's quantity up or down.
    ///
    /// Decreasing a quantity of 1 removes the line entirely; a stored
    /// quantity of 0 never exists. Unknown variant IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn update_quantity(
        &mut self,
        variant_id: &VariantId,
        change: QuantityChange,
    ) -> Result<(), CartStoreError> {
        let Some(index) = self
            .items
            .iter()
            .position(|item| item.variant_id == *variant_id)
        else {
            return Ok(());
        };

        match change {
            QuantityChange::Increase => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity += 1;
                }
            }
            QuantityChange::Decrease => {
                let remove = self.items.get(index).is_some_and(|item| item.quantity <= 1);
                if remove {
                    self.items.remove(index);
                } else if let Some(item) = self.items.get_mut(index) {
                    item.quantity -= 1;
                }
            }
        }
        self.persist()
    }

    /// Empty the cart. Called after a successful order placement.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.items.clear();
        self.persist()
    }

    /// Write the cart through to its file.
    fn persist(&self) -> Result<(), CartStoreError> {
        let stored = StoredCart {
            version: STORAGE_VERSION,
            items: self.items.clone(),
        };
        let raw = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
