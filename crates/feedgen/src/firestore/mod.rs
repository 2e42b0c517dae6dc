//! Firestore REST API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` - no SDK dependency, no local sync
//! - Documents are deserialized into the loose wire model in [`types`]
//!   and converted to domain types by [`conversions`]; both steps are
//!   total and never fail on missing fields
//! - Reads are bounded single pages; no pagination is attempted
//!
//! The client is cheap to clone (`Arc` inner) so each store task in the
//! pipeline can own one.

pub mod conversions;
pub mod types;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument};
use vitrine_core::{CatalogItem, StoreConfig};

use crate::config::FirestoreConfig;
use crate::pipeline::CatalogSource;
use types::{FsDocument, ListDocumentsResponse};

/// Errors that can occur when reading from Firestore.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Firestore returned a non-success status.
    #[error("Firestore returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Requested document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    http: reqwest::Client,
    /// Base URL down to `.../documents`; request paths append below it.
    base_url: String,
    api_key: Option<SecretString>,
    catalog_page_size: u32,
    registry_page_size: u32,
}

impl FirestoreClient {
    /// Create a new client for one Firestore project.
    #[must_use]
    pub fn new(config: &FirestoreConfig) -> Self {
        let base_url = format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            config.project_id
        );

        Self {
            inner: Arc::new(FirestoreClientInner {
                http: reqwest::Client::new(),
                base_url,
                api_key: config.api_key.clone(),
                catalog_page_size: config.catalog_page_size,
                registry_page_size: config.registry_page_size,
            }),
        }
    }

    /// Execute a GET request and deserialize the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FirestoreError> {
        let url = format!("{}/{path}", self.inner.base_url);
        let mut request = self.inner.http.get(&url).query(query);
        if let Some(key) = &self.inner.api_key {
            request = request.query(&[("key", key.expose_secret())]);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FirestoreError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Firestore returned non-success status"
            );
            return Err(FirestoreError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse Firestore response"
                );
                Err(FirestoreError::Parse(e))
            }
        }
    }

    /// List store identifiers from the registry collection.
    ///
    /// Bounded single page; no pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self))]
    pub async fn list_store_ids(&self) -> Result<Vec<String>, FirestoreError> {
        let query = [("pageSize", self.inner.registry_page_size.to_string())];
        let response: ListDocumentsResponse = self.get_json("stores", &query).await?;

        let ids: Vec<String> = response
            .documents
            .iter()
            .map(|doc| doc.doc_id().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        debug!(count = ids.len(), "listed stores");
        Ok(ids)
    }

    /// Fetch one store's configuration document.
    ///
    /// A missing document, or one without any recognizable field
    /// structure, is `Ok(None)` ("no config"), not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than
    /// the document not existing.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn fetch_store_config(
        &self,
        store_id: &str,
    ) -> Result<Option<StoreConfig>, FirestoreError> {
        let path = format!("stores/{store_id}/config/store");
        match self.get_json::<FsDocument>(&path, &[]).await {
            Ok(doc) if doc.has_fields() => Ok(Some(conversions::store_config(&doc))),
            Ok(_) => {
                debug!("config document has no fields");
                Ok(None)
            }
            Err(FirestoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch one store's catalog items, bounded to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn fetch_catalog(&self, store_id: &str) -> Result<Vec<CatalogItem>, FirestoreError> {
        let path = format!("stores/{store_id}/products");
        let query = [("pageSize", self.inner.catalog_page_size.to_string())];
        let response: ListDocumentsResponse = self.get_json(&path, &query).await?;

        let items: Vec<CatalogItem> = response
            .documents
            .iter()
            .map(conversions::catalog_item)
            .collect();
        debug!(count = items.len(), "fetched catalog");
        Ok(items)
    }
}

impl CatalogSource for FirestoreClient {
    async fn list_store_ids(&self) -> Result<Vec<String>, FirestoreError> {
        Self::list_store_ids(self).await
    }

    async fn fetch_store_config(
        &self,
        store_id: &str,
    ) -> Result<Option<StoreConfig>, FirestoreError> {
        Self::fetch_store_config(self, store_id).await
    }

    async fn fetch_catalog(&self, store_id: &str) -> Result<Vec<CatalogItem>, FirestoreError> {
        Self::fetch_catalog(self, store_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FirestoreConfig {
        FirestoreConfig {
            project_id: "test-project".to_string(),
            api_key: None,
            catalog_page_size: 1000,
            registry_page_size: 300,
        }
    }

    #[test]
    fn test_base_url_includes_project() {
        let client = FirestoreClient::new(&test_config());
        assert_eq!(
            client.inner.base_url,
            "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents"
        );
    }

    #[test]
    fn test_firestore_error_display() {
        let err = FirestoreError::NotFound("stores/x/config/store".to_string());
        assert_eq!(err.to_string(), "Not found: stores/x/config/store");

        let err = FirestoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Firestore returned 503: unavailable");
    }
}
