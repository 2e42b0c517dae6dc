//! Test fixtures for end-to-end pipeline scenarios.
//!
//! [`FixtureSource`] implements the pipeline's `CatalogSource` trait over
//! raw Firestore REST JSON, so scenarios exercise the real wire-format
//! deserialization and conversion path - only the HTTP transport is
//! replaced. Failure injection covers the listing, per-store catalog
//! errors, and outright panics (for the isolation guarantees).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Value, json};
use vitrine_core::{CatalogItem, StoreConfig};
use vitrine_feedgen::firestore::types::FsDocument;
use vitrine_feedgen::firestore::{FirestoreError, conversions};
use vitrine_feedgen::pipeline::CatalogSource;

/// Builder for an in-memory catalog source.
#[derive(Debug, Default)]
pub struct FixtureBuilder {
    inner: Inner,
}

#[derive(Debug, Default)]
struct Inner {
    store_ids: Vec<String>,
    fail_listing: bool,
    configs: HashMap<String, Value>,
    catalogs: HashMap<String, Vec<Value>>,
    fail_catalog: HashSet<String>,
    panic_catalog: HashSet<String>,
}

impl FixtureBuilder {
    /// Register a store id in the registry listing.
    #[must_use]
    pub fn store(mut self, store_id: &str) -> Self {
        self.inner.store_ids.push(store_id.to_string());
        self
    }

    /// Set a store's raw config document (Firestore REST JSON).
    #[must_use]
    pub fn config(mut self, store_id: &str, doc: Value) -> Self {
        self.inner.configs.insert(store_id.to_string(), doc);
        self
    }

    /// Set a store's raw catalog documents (Firestore REST JSON).
    #[must_use]
    pub fn catalog(mut self, store_id: &str, docs: Vec<Value>) -> Self {
        self.inner.catalogs.insert(store_id.to_string(), docs);
        self
    }

    /// Make the registry listing fail.
    #[must_use]
    pub fn fail_listing(mut self) -> Self {
        self.inner.fail_listing = true;
        self
    }

    /// Make one store's catalog fetch fail.
    #[must_use]
    pub fn fail_catalog(mut self, store_id: &str) -> Self {
        self.inner.fail_catalog.insert(store_id.to_string());
        self
    }

    /// Make one store's catalog fetch panic.
    #[must_use]
    pub fn panic_catalog(mut self, store_id: &str) -> Self {
        self.inner.panic_catalog.insert(store_id.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> FixtureSource {
        FixtureSource {
            inner: Arc::new(self.inner),
        }
    }
}

/// In-memory `CatalogSource` serving raw Firestore JSON fixtures.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    inner: Arc<Inner>,
}

impl FixtureSource {
    #[must_use]
    pub fn builder() -> FixtureBuilder {
        FixtureBuilder::default()
    }
}

fn unavailable(what: &str) -> FirestoreError {
    FirestoreError::Status {
        status: 503,
        body: format!("{what} unavailable"),
    }
}

impl CatalogSource for FixtureSource {
    async fn list_store_ids(&self) -> Result<Vec<String>, FirestoreError> {
        if self.inner.fail_listing {
            return Err(unavailable("listing"));
        }
        Ok(self.inner.store_ids.clone())
    }

    async fn fetch_store_config(
        &self,
        store_id: &str,
    ) -> Result<Option<StoreConfig>, FirestoreError> {
        let Some(raw) = self.inner.configs.get(store_id) else {
            return Ok(None);
        };
        let doc: FsDocument = serde_json::from_value(raw.clone())?;
        if !doc.has_fields() {
            return Ok(None);
        }
        Ok(Some(conversions::store_config(&doc)))
    }

    async fn fetch_catalog(&self, store_id: &str) -> Result<Vec<CatalogItem>, FirestoreError> {
        assert!(
            !self.inner.panic_catalog.contains(store_id),
            "fixture: catalog fetch panicked for {store_id}"
        );
        if self.inner.fail_catalog.contains(store_id) {
            return Err(unavailable("catalog"));
        }

        let raw = self.inner.catalogs.get(store_id).cloned().unwrap_or_default();
        let mut items = Vec::with_capacity(raw.len());
        for doc in raw {
            let doc: FsDocument = serde_json::from_value(doc)?;
            items.push(conversions::catalog_item(&doc));
        }
        Ok(items)
    }
}

// =============================================================================
// Document helpers
// =============================================================================

/// A `config/store` document with the given `fields` object.
#[must_use]
pub fn config_doc(store_id: &str, fields: Value) -> Value {
    json!({
        "name": format!(
            "projects/test/databases/(default)/documents/stores/{store_id}/config/store"
        ),
        "fields": fields,
    })
}

/// A product document with the given `fields` object.
#[must_use]
pub fn product_doc(store_id: &str, product_id: &str, fields: Value) -> Value {
    json!({
        "name": format!(
            "projects/test/databases/(default)/documents/stores/{store_id}/products/{product_id}"
        ),
        "fields": fields,
    })
}
