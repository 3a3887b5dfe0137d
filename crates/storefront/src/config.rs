//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MITHAI_CURRENCY` - Currency of catalog prices (default: INR)
//! - `MITHAI_PAYMENT_LATENCY_MS` - Mock payment delay in milliseconds (default: 2000)
//! - `MITHAI_NOTIFICATION_TTL_MS` - Success toast lifetime in milliseconds (default: 3000)
//! - `MITHAI_SEED_HISTORY` - Seed the mock history entries (default: true)
//! - `MITHAI_API_BASE_URL` - Base of the backend contract (default: /api)

use std::time::Duration;

use mithai_core::CurrencyCode;
use thiserror::Error;

const DEFAULT_PAYMENT_LATENCY_MS: u64 = 2000;
const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;
const DEFAULT_API_BASE_URL: &str = "/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Currency catalog prices are quoted in
    pub currency: CurrencyCode,
    /// How long the mock gateway takes to approve a payment
    pub payment_latency: Duration,
    /// How long the success toast stays up
    pub notification_ttl: Duration,
    /// Whether a new session starts with the mock history entries
    pub seed_history: bool,
    /// Base URL the API contract endpoints are joined to
    pub api_base_url: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::INR,
            payment_latency: Duration::from_millis(DEFAULT_PAYMENT_LATENCY_MS),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            seed_history: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let currency = get_or_default(&lookup, "MITHAI_CURRENCY", "INR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("MITHAI_CURRENCY".to_string(), e))?;
        let payment_latency = get_millis(&lookup, "MITHAI_PAYMENT_LATENCY_MS", DEFAULT_PAYMENT_LATENCY_MS)?;
        let notification_ttl =
            get_millis(&lookup, "MITHAI_NOTIFICATION_TTL_MS", DEFAULT_NOTIFICATION_TTL_MS)?;
        let seed_history = parse_bool(
            "MITHAI_SEED_HISTORY",
            &get_or_default(&lookup, "MITHAI_SEED_HISTORY", "true"),
        )?;
        let api_base_url = get_or_default(&lookup, "MITHAI_API_BASE_URL", DEFAULT_API_BASE_URL);

        Ok(Self {
            currency,
            payment_latency,
            notification_ttl,
            seed_history,
            api_base_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable through `lookup` with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a millisecond duration.
fn get_millis<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(Duration::from_millis(default)), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
