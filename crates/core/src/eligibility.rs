//! Admission policy deciding which stores get a feed.
//!
//! The decision is `override OR (plan-match AND NOT suspended)`:
//!
//! 1. **Identity override** - the bootstrap store is admitted
//!    unconditionally, before any config field is consulted. A bootstrap
//!    store with a missing or empty config document is still admitted.
//! 2. **Plan match** - the plan identifier is extracted through an ordered
//!    fallback chain (nested `plan.planId`, top-level `planId`, top-level
//!    `planName`), normalized, and matched by *substring* against the
//!    allow-listed tokens. Substring matching is intentional: upstream data
//!    carries both bare codes (`beta_tester`) and human-readable names
//!    embedding the same token (`Plano Profissional Anual`). Legacy configs
//!    are additionally matched by exact plan-name literal.
//! 3. **Status gate** - an explicit `suspended` status rejects even a
//!    matching plan; every other status (including absent) passes.

use crate::types::{StoreConfig, SubscriptionStatus};

/// Admission policy for feed generation.
///
/// All matching constants are injected at construction; [`Default`]
/// supplies the production values. The policy has no side effects and
/// never fails: unreadable config fields degrade to empty strings.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    /// Store admitted unconditionally, compared case-insensitively.
    bootstrap_store_id: String,
    /// Lowercase tokens matched by substring against the normalized
    /// plan identifier.
    plan_tokens: Vec<String>,
    /// Exact plan-name literals accepted from legacy config shapes.
    plan_names: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            bootstrap_store_id: "dandan".to_string(),
            plan_tokens: vec!["profissional".to_string(), "beta_tester".to_string()],
            plan_names: vec!["Profissional".to_string(), "Beta Tester".to_string()],
        }
    }
}

impl EligibilityPolicy {
    /// Create a policy with explicit matching constants.
    #[must_use]
    pub const fn new(
        bootstrap_store_id: String,
        plan_tokens: Vec<String>,
        plan_names: Vec<String>,
    ) -> Self {
        Self {
            bootstrap_store_id,
            plan_tokens,
            plan_names,
        }
    }

    /// Decide whether `store_id` is admitted for feed generation.
    ///
    /// Deterministic and infallible. The identity override is evaluated
    /// first and short-circuits everything else, including config presence.
    #[must_use]
    pub fn resolve(&self, store_id: &str, config: &StoreConfig) -> bool {
        if store_id.eq_ignore_ascii_case(&self.bootstrap_store_id) {
            return true;
        }
        self.plan_matches(config) && config.subscription_status != SubscriptionStatus::Suspended
    }

    /// Extract the normalized plan identifier from a config record.
    ///
    /// Evaluates the fallback chain in order - nested `plan.planId`,
    /// top-level `planId`, top-level `planName` - and returns the first
    /// present, non-blank value trimmed and lowercased. Empty string when
    /// no accessor yields anything.
    #[must_use]
    pub fn plan_identifier(config: &StoreConfig) -> String {
        [
            config.plan_id.as_deref(),
            config.legacy_plan_id.as_deref(),
            config.legacy_plan_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_lowercase()
    }

    fn plan_matches(&self, config: &StoreConfig) -> bool {
        let identifier = Self::plan_identifier(config);
        if !identifier.is_empty()
            && self
                .plan_tokens
                .iter()
                .any(|token| identifier.contains(token.as_str()))
        {
            return true;
        }

        // Legacy variants store a human-entered plan name; those are matched
        // exactly (case-sensitive) after trimming.
        [config.plan_name.as_deref(), config.legacy_plan_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .any(|name| self.plan_names.iter().any(|allowed| allowed == name))
    }
}
