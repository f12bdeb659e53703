//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Smokehaus IDs come
//! from the catalog and order APIs as opaque strings, so the wrappers hold
//! `String` rather than integers.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use smokehaus_core::define_id;
/// define_id!(ProductId);
/// define_id!(VariantId);
///
/// let product_id = ProductId::new("brisket");
/// let variant_id = VariantId::new("brisket");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variant_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariantId);
define_id!(OrderId);

impl OrderId {
    /// Derive the short, human-facing order ID.
    ///
    /// The short ID is the uppercased prefix of the full identifier before
    /// its first `-`. It is what customers see on the success screen and in
    /// the composed WhatsApp message, so the derivation must stay stable.
    ///
    /// ```
    /// use smokehaus_core::OrderId;
    ///
    /// let id = OrderId::new("a1b2c3d4-e5f6-7890");
    /// assert_eq!(id.short(), "A1B2C3D4");
    /// ```
    #[must_use]
    pub fn short(&self) -> String {
        self.as_str()
            .split('-')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_derivation() {
        let id = OrderId::new("a1b2c3d4-e5f6-7890-abcd-ef0123456789");
        assert_eq!(id.short(), "A1B2C3D4");
    }

    #[test]
    fn test_short_id_without_separator() {
        // An ID with no hyphen uppercases the whole string.
        let id = OrderId::new("abc123");
        assert_eq!(id.short(), "ABC123");
    }

    #[test]
    fn test_short_id_empty() {
        let id = OrderId::new("");
        assert_eq!(id.short(), "");
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ProductId::new("brisket");
        assert_eq!(format!("{id}"), "brisket");
        assert_eq!(id.as_str(), "brisket");
    }

    #[test]
    fn test_serde_transparent() {
        let id = VariantId::new("brisket-half");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"brisket-half\"");

        let parsed: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
