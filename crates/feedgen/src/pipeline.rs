//! Per-store feed generation pipeline.
//!
//! Stores are processed as independent tasks: each runs config-fetch →
//! eligibility → catalog-fetch → build → write strictly in order, owns all
//! of its data, and is wrapped in its own failure boundary. A fetch error,
//! write error, or panic in one store's task is logged, counted, and never
//! affects any other store. Tasks are joined before the run completes; no
//! ordering is guaranteed between stores.

use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use vitrine_core::{CatalogItem, EligibilityPolicy, Feed, FeedProfile, StoreConfig};

use crate::firestore::FirestoreError;
use crate::output;

/// The three reads the pipeline needs from the catalog backend.
///
/// [`crate::firestore::FirestoreClient`] is the production implementation;
/// tests drive the pipeline with an in-memory source.
pub trait CatalogSource: Clone + Send + Sync + 'static {
    /// List the identifiers of all known stores.
    fn list_store_ids(&self) -> impl Future<Output = Result<Vec<String>, FirestoreError>> + Send;

    /// Fetch one store's configuration; `None` means "no config".
    fn fetch_store_config(
        &self,
        store_id: &str,
    ) -> impl Future<Output = Result<Option<StoreConfig>, FirestoreError>> + Send;

    /// Fetch one store's catalog items.
    fn fetch_catalog(
        &self,
        store_id: &str,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, FirestoreError>> + Send;
}

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory feed files are written to (created if missing).
    pub output_dir: PathBuf,
    /// Store ids substituted when the registry listing is unavailable
    /// or empty, so a transient listing failure never yields a zero-store
    /// run.
    pub fallback_stores: Vec<String>,
}

/// Counts reported after a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Stores the run attempted.
    pub stores: usize,
    /// Feeds written to disk.
    pub written: usize,
    /// Stores excluded by the eligibility policy or missing config.
    pub skipped: usize,
    /// Stores whose task failed outright (write error or panic).
    pub failed: usize,
}

/// Fatal, run-level failures. Everything store-scoped is contained inside
/// the per-store tasks and reported through [`RunSummary`] instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no stores to process: registry unavailable and no fallback configured")]
    NoStores,

    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one store's pipeline, after its failure boundary.
enum StoreOutcome {
    Written,
    Skipped,
    Failed,
}

/// Run the full pipeline: resolve store ids, fan out one task per store,
/// join them all, and report totals.
///
/// # Errors
///
/// Returns [`RunError`] only for fatal, run-level failures: an unusable
/// output directory, or no stores to process at all.
pub async fn run<S: CatalogSource>(
    source: &S,
    policy: &EligibilityPolicy,
    profile: &FeedProfile,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    tokio::fs::create_dir_all(&options.output_dir)
        .await
        .map_err(|source| RunError::OutputDir {
            path: options.output_dir.clone(),
            source,
        })?;

    let store_ids = resolve_store_ids(source, &options.fallback_stores).await?;
    let generated_at = Utc::now();
    info!(stores = store_ids.len(), "starting feed generation run");

    let mut tasks = JoinSet::new();
    let mut summary = RunSummary {
        stores: store_ids.len(),
        ..RunSummary::default()
    };

    for store_id in store_ids {
        let source = source.clone();
        let policy = policy.clone();
        let profile = profile.clone();
        let output_dir = options.output_dir.clone();
        tasks.spawn(async move {
            process_store(&source, &policy, &profile, &output_dir, &store_id, generated_at).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(StoreOutcome::Written) => summary.written += 1,
            Ok(StoreOutcome::Skipped) => summary.skipped += 1,
            Ok(StoreOutcome::Failed) => summary.failed += 1,
            Err(join_error) => {
                // A panic inside one store's task must not take the run down.
                error!(error = %join_error, "store task aborted");
                summary.failed += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "feed generation run complete"
    );
    Ok(summary)
}

/// Resolve the store ids for this run.
///
/// The remote listing wins when it yields anything; an error or an empty
/// page degrades to the configured fallback list.
async fn resolve_store_ids<S: CatalogSource>(
    source: &S,
    fallback: &[String],
) -> Result<Vec<String>, RunError> {
    let ids = match source.list_store_ids().await {
        Ok(ids) if !ids.is_empty() => ids,
        Ok(_) => {
            warn!("store listing returned no documents, using fallback list");
            fallback.to_vec()
        }
        Err(e) => {
            warn!(error = %e, "store listing unavailable, using fallback list");
            fallback.to_vec()
        }
    };

    if ids.is_empty() {
        return Err(RunError::NoStores);
    }
    Ok(ids)
}

/// One store's pipeline, start to finish. Never propagates an error:
/// every failure is converted into an outcome here, at the store boundary.
async fn process_store<S: CatalogSource>(
    source: &S,
    policy: &EligibilityPolicy,
    profile: &FeedProfile,
    output_dir: &Path,
    store_id: &str,
    generated_at: DateTime<Utc>,
) -> StoreOutcome {
    // An unreadable or absent config resolves against an empty record, so
    // the identity override still applies before config presence matters.
    let config = match source.fetch_store_config(store_id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            info!(store_id, "no config document");
            StoreConfig::default()
        }
        Err(e) => {
            warn!(store_id, error = %e, "config unreadable");
            StoreConfig::default()
        }
    };

    if !policy.resolve(store_id, &config) {
        info!(
            store_id,
            plan = %EligibilityPolicy::plan_identifier(&config),
            "store not eligible, skipping"
        );
        return StoreOutcome::Skipped;
    }

    // Catalog failures degrade to an empty feed: the store stays present
    // in the output with a valid empty-channel document.
    let items = match source.fetch_catalog(store_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(store_id, error = %e, "catalog unreadable, writing empty feed");
            Vec::new()
        }
    };

    let store_name = config.display_name(store_id).to_string();
    let feed = Feed::build(profile, store_id, &store_name, &items, generated_at);

    match output::write_feed(output_dir, store_id, &feed.to_xml()).await {
        Ok(path) => {
            info!(
                store_id,
                path = %path.display(),
                entries = feed.entries.len(),
                "feed written"
            );
            StoreOutcome::Written
        }
        Err(e) => {
            error!(store_id, error = %e, "failed to write feed");
            StoreOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;

    /// In-memory catalog source for pipeline tests.
    #[derive(Clone, Default)]
    struct StubSource {
        inner: Arc<StubInner>,
    }

    #[derive(Default)]
    struct StubInner {
        store_ids: Vec<String>,
        fail_listing: bool,
        configs: HashMap<String, StoreConfig>,
        catalogs: HashMap<String, Vec<CatalogItem>>,
        fail_catalog: Vec<String>,
    }

    fn unavailable() -> FirestoreError {
        FirestoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    impl CatalogSource for StubSource {
        async fn list_store_ids(&self) -> Result<Vec<String>, FirestoreError> {
            if self.inner.fail_listing {
                return Err(unavailable());
            }
            Ok(self.inner.store_ids.clone())
        }

        async fn fetch_store_config(
            &self,
            store_id: &str,
        ) -> Result<Option<StoreConfig>, FirestoreError> {
            Ok(self.inner.configs.get(store_id).cloned())
        }

        async fn fetch_catalog(&self, store_id: &str) -> Result<Vec<CatalogItem>, FirestoreError> {
            if self.inner.fail_catalog.iter().any(|id| id == store_id) {
                return Err(unavailable());
            }
            Ok(self.inner.catalogs.get(store_id).cloned().unwrap_or_default())
        }
    }

    fn paid_config(name: &str) -> StoreConfig {
        StoreConfig {
            store_name: Some(name.to_string()),
            plan_id: Some("profissional".to_string()),
            ..StoreConfig::default()
        }
    }

    fn options(dir: &tempfile::TempDir) -> RunOptions {
        RunOptions {
            output_dir: dir.path().to_path_buf(),
            fallback_stores: vec!["dandan".to_string()],
        }
    }

    #[tokio::test]
    async fn test_eligible_store_gets_feed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource {
            inner: Arc::new(StubInner {
                store_ids: vec!["acme".to_string()],
                configs: HashMap::from([("acme".to_string(), paid_config("Acme"))]),
                ..StubInner::default()
            }),
        };

        let summary = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &options(&dir),
        )
        .await
        .expect("run");

        assert_eq!(summary.written, 1);
        assert!(dir.path().join("acme.xml").exists());
    }

    #[tokio::test]
    async fn test_ineligible_store_skipped_without_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource {
            inner: Arc::new(StubInner {
                store_ids: vec!["acme".to_string()],
                // No config at all: rejected (no identity override for acme).
                ..StubInner::default()
            }),
        };

        let summary = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &options(&dir),
        )
        .await
        .expect("run");

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written, 0);
        assert!(!dir.path().join("acme.xml").exists());
    }

    #[tokio::test]
    async fn test_catalog_failure_still_writes_empty_feed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource {
            inner: Arc::new(StubInner {
                store_ids: vec!["acme".to_string()],
                configs: HashMap::from([("acme".to_string(), paid_config("Acme"))]),
                fail_catalog: vec!["acme".to_string()],
                ..StubInner::default()
            }),
        };

        let summary = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &options(&dir),
        )
        .await
        .expect("run");

        assert_eq!(summary.written, 1);
        let content =
            std::fs::read_to_string(dir.path().join("acme.xml")).expect("feed file");
        assert!(content.contains("<channel>"));
        assert!(!content.contains("<item>"));
    }

    #[tokio::test]
    async fn test_listing_failure_uses_fallback_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource {
            inner: Arc::new(StubInner {
                fail_listing: true,
                ..StubInner::default()
            }),
        };

        let summary = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &options(&dir),
        )
        .await
        .expect("run");

        // The fallback store is the bootstrap store: admitted via override.
        assert_eq!(summary.stores, 1);
        assert_eq!(summary.written, 1);
        assert!(dir.path().join("dandan.xml").exists());
    }

    #[tokio::test]
    async fn test_no_stores_anywhere_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource {
            inner: Arc::new(StubInner {
                fail_listing: true,
                ..StubInner::default()
            }),
        };
        let opts = RunOptions {
            output_dir: dir.path().to_path_buf(),
            fallback_stores: Vec::new(),
        };

        let result = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &opts,
        )
        .await;

        assert!(matches!(result, Err(RunError::NoStores)));
    }

    #[tokio::test]
    async fn test_empty_listing_degrades_to_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = StubSource::default();

        let summary = run(
            &source,
            &EligibilityPolicy::default(),
            &FeedProfile::default(),
            &options(&dir),
        )
        .await
        .expect("run");

        assert_eq!(summary.stores, 1);
        assert!(dir.path().join("dandan.xml").exists());
    }
}
