//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SMOKEHAUS_API_BASE` - Base URL of the order API
//! - `SMOKEHAUS_WHATSAPP_NUMBER` - WhatsApp number for the order handoff,
//!   international format (a leading `+` is accepted and stripped)
//! - `SMOKEHAUS_STORE_LAT` / `SMOKEHAUS_STORE_LNG` - Kitchen coordinates
//!   used by the delivery-fee calculator
//!
//! ## Optional
//! - `SMOKEHAUS_STORAGE_DIR` - Directory for the persisted cart (default: `data`)
//! - `SMOKEHAUS_GEOCODER_BASE` - Reverse-geocoding endpoint base
//!   (default: `https://nominatim.openstreetmap.org`)
//! - `SMOKEHAUS_FALLBACK_AREA` - Area string pre-filled into the address
//!   field when reverse geocoding is unavailable

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::geo::Coordinates;

const DEFAULT_GEOCODER_BASE: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_STORAGE_DIR: &str = "data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout application configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the order API
    pub api_base: Url,
    /// WhatsApp handoff number, digits only, no leading `+`
    pub whatsapp_number: String,
    /// Kitchen coordinates for the delivery-fee calculation
    pub store_location: Coordinates,
    /// Directory holding the persisted cart file
    pub storage_dir: PathBuf,
    /// Reverse-geocoding endpoint base URL
    pub geocoder_base: Url,
    /// Area pre-filled into the address field when geocoding is unavailable
    pub fallback_area: Option<String>,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = parse_url("SMOKEHAUS_API_BASE", &get_required_env("SMOKEHAUS_API_BASE")?)?;
        let whatsapp_number = parse_whatsapp_number(
            "SMOKEHAUS_WHATSAPP_NUMBER",
            &get_required_env("SMOKEHAUS_WHATSAPP_NUMBER")?,
        )?;
        let store_location = Coordinates {
            lat: parse_coordinate("SMOKEHAUS_STORE_LAT", &get_required_env("SMOKEHAUS_STORE_LAT")?)?,
            lng: parse_coordinate("SMOKEHAUS_STORE_LNG", &get_required_env("SMOKEHAUS_STORE_LNG")?)?,
        };
        let storage_dir =
            PathBuf::from(get_env_or_default("SMOKEHAUS_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let geocoder_base = parse_url(
            "SMOKEHAUS_GEOCODER_BASE",
            &get_env_or_default("SMOKEHAUS_GEOCODER_BASE", DEFAULT_GEOCODER_BASE),
        )?;
        let fallback_area = get_optional_env("SMOKEHAUS_FALLBACK_AREA");

        Ok(Self {
            api_base,
            whatsapp_number,
            store_location,
            storage_dir,
            geocoder_base,
            fallback_area,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a latitude/longitude component.
fn parse_coordinate(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Normalize and validate a WhatsApp handoff number.
///
/// `wa.me` links require the international number without the `+`, so a
/// leading `+` is stripped; anything else must be digits.
fn parse_whatsapp_number(key: &str, value: &str) -> Result<String, ConfigError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "expected an international phone number, digits only".to_string(),
        ));
    }
    Ok(digits.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whatsapp_number_strips_plus() {
        assert_eq!(
            parse_whatsapp_number("TEST", "+919812345678").unwrap(),
            "919812345678"
        );
    }

    #[test]
    fn test_parse_whatsapp_number_plain_digits() {
        assert_eq!(
            parse_whatsapp_number("TEST", "919812345678").unwrap(),
            "919812345678"
        );
    }

    #[test]
    fn test_parse_whatsapp_number_rejects_garbage() {
        assert!(parse_whatsapp_number("TEST", "98-123").is_err());
        assert!(parse_whatsapp_number("TEST", "").is_err());
        assert!(parse_whatsapp_number("TEST", "+").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert!((parse_coordinate("TEST", "17.4126").unwrap() - 17.4126).abs() < f64::EPSILON);
        assert!(parse_coordinate("TEST", "north").is_err());
    }

    #[test]
    fn test_parse_url() {
        assert!(parse_url("TEST", "https://api.smokehaus.in").is_ok());
        assert!(parse_url("TEST", "not a url").is_err());
    }
}
