//! Feedgen configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FEEDGEN_PROJECT_ID` - Firestore project identifier
//!
//! ## Optional
//! - `FEEDGEN_BASE_URL` - Public storefront base URL
//!   (default: `https://loja.vitrineonline.app.br`)
//! - `FEEDGEN_OUTPUT_DIR` - Directory for generated feed files (default: feeds)
//! - `FEEDGEN_CURRENCY` - ISO 4217 currency code for prices (default: BRL)
//! - `FEEDGEN_PRODUCT_CATEGORY` - Google product category emitted per item
//!   (default: `Apparel & Accessories`)
//! - `FEEDGEN_PAGE_SIZE` - Max catalog documents per store (default: 1000)
//! - `FEEDGEN_REGISTRY_PAGE_SIZE` - Max store documents listed (default: 300)
//! - `FEEDGEN_FALLBACK_STORES` - Comma-separated store ids used when the
//!   registry listing is unavailable (default: dandan)
//! - `FIRESTORE_API_KEY` - API key appended to Firestore requests

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use vitrine_core::FeedProfile;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Complete feedgen configuration.
#[derive(Debug, Clone)]
pub struct FeedgenConfig {
    /// Firestore connection settings.
    pub firestore: FirestoreConfig,
    /// Feed rendering settings injected into the builder.
    pub profile: FeedProfile,
    /// Directory feed files are written to (created if missing).
    pub output_dir: PathBuf,
    /// Store ids substituted when the registry listing is unavailable.
    pub fallback_stores: Vec<String>,
}

/// Firestore REST API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirestoreConfig {
    /// Firestore project identifier.
    pub project_id: String,
    /// Optional API key sent as the `key` query parameter.
    pub api_key: Option<SecretString>,
    /// Maximum catalog documents fetched per store (first page only).
    pub catalog_page_size: u32,
    /// Maximum store documents fetched from the registry listing.
    pub registry_page_size: u32,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_page_size", &self.catalog_page_size)
            .field("registry_page_size", &self.registry_page_size)
            .finish()
    }
}

impl FeedgenConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("FEEDGEN_BASE_URL", "https://loja.vitrineonline.app.br");
        // Parsed only for validation; links are built by simple joining.
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("FEEDGEN_BASE_URL".to_string(), e.to_string())
        })?;

        let currency = get_env_or_default("FEEDGEN_CURRENCY", "BRL")
            .parse()
            .map_err(|e: String| ConfigError::InvalidEnvVar("FEEDGEN_CURRENCY".to_string(), e))?;

        let profile = FeedProfile {
            base_url,
            currency,
            product_category: get_env_or_default("FEEDGEN_PRODUCT_CATEGORY", "Apparel & Accessories"),
        };

        let fallback_stores =
            parse_store_list(&get_env_or_default("FEEDGEN_FALLBACK_STORES", "dandan"));

        Ok(Self {
            firestore: FirestoreConfig::from_env()?,
            profile,
            output_dir: PathBuf::from(get_env_or_default("FEEDGEN_OUTPUT_DIR", "feeds")),
            fallback_stores,
        })
    }
}

impl FirestoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FEEDGEN_PROJECT_ID")?,
            api_key: get_optional_env("FIRESTORE_API_KEY").map(SecretString::from),
            catalog_page_size: get_parsed_or_default("FEEDGEN_PAGE_SIZE", 1000)?,
            registry_page_size: get_parsed_or_default("FEEDGEN_REGISTRY_PAGE_SIZE", 300)?,
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

/// Get an environment variable parsed as `u32`, with a default.
fn get_parsed_or_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(key.to_string(), format!("not a number: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated store list, dropping blanks.
fn parse_store_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}
