//! Store configuration as read from the per-store config document.
//!
//! Config documents are written by several generations of the onboarding
//! flow, so the shape is inconsistent between stores: plan information may
//! live in a nested `plan` object, at the top level, or both. Every field
//! is optional and a fully empty config is valid input everywhere.

use serde::{Deserialize, Serialize};

/// Subscription state of a store.
///
/// Parsing is tolerant: anything that is not a recognized value maps to
/// [`SubscriptionStatus::Unknown`], which is treated as active by the
/// eligibility policy. Only an explicit `suspended` blocks feed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Suspended,
    #[default]
    Unknown,
}

impl SubscriptionStatus {
    /// Parse a raw status string. Never fails; trims and lowercases first.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }
}

/// A store's configuration record.
///
/// The `plan_id`/`plan_name` pair comes from the nested `plan` object;
/// the `legacy_*` pair holds the same information written at the top level
/// by older onboarding flows. The eligibility policy evaluates them in a
/// fixed first-match-wins order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Display name shown in channel metadata and as the brand.
    pub store_name: Option<String>,
    /// Subscription state; absent parses to `Unknown`.
    pub subscription_status: SubscriptionStatus,
    /// Plan identifier from the nested `plan` object.
    pub plan_id: Option<String>,
    /// Plan display name from the nested `plan` object.
    pub plan_name: Option<String>,
    /// Top-level plan identifier (legacy shape).
    pub legacy_plan_id: Option<String>,
    /// Top-level plan display name (legacy shape).
    pub legacy_plan_name: Option<String>,
}

impl StoreConfig {
    /// The store's display name, falling back to its identifier when the
    /// config carries no usable name.
    #[must_use]
    pub fn display_name<'a>(&'a self, store_id: &'a str) -> &'a str {
        self.store_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(store_id)
    }
}
