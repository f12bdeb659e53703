//! User-entered checkout data.

use smokehaus_core::Email;

/// Delivery details entered at checkout.
///
/// Transient by design: never persisted across sessions. Checkout submission
/// is allowed only once [`Self::is_complete`] holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub name: String,
    pub mobile: String,
    pub address: String,
    /// Optional; only needed for the invoice-email sub-flow.
    pub email: Option<Email>,
}

impl DeliveryDetails {
    /// Whether the required fields (name, mobile, address) are all filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.mobile.trim().is_empty()
            && !self.address.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_requires_all_three_fields() {
        let mut details = DeliveryDetails {
            name: "Asha".to_string(),
            mobile: "9812345678".to_string(),
            address: "Road No. 1, Banjara Hills".to_string(),
            email: None,
        };
        assert!(details.is_complete());

        details.address.clear();
        assert!(!details.is_complete());
    }

    #[test]
    fn test_whitespace_only_fields_are_incomplete() {
        let details = DeliveryDetails {
            name: "  ".to_string(),
            mobile: "9812345678".to_string(),
            address: "somewhere".to_string(),
            email: None,
        };
        assert!(!details.is_complete());
    }

    #[test]
    fn test_email_is_optional() {
        let details = DeliveryDetails {
            name: "Asha".to_string(),
            mobile: "9812345678".to_string(),
            address: "somewhere".to_string(),
            email: None,
        };
        assert!(details.is_complete());
    }
}
