//! Catalog items as read from a store's product documents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single product from a store's catalog.
///
/// Every field except `id` is optional; upstream documents routinely omit
/// fields and the feed mapping degrades each one to a documented default
/// instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Final path segment of the product's storage resource name.
    pub id: String,
    pub name: Option<String>,
    /// Falls back to `name` in the feed mapping when absent.
    pub description: Option<String>,
    /// Publication status; only the literal `active` is included in feeds.
    pub status: Option<String>,
    /// Regular price; `None` renders as `0.00`.
    pub price: Option<Decimal>,
    /// Promotional price; `Some` exactly when the source document carried
    /// the promotional field at all, even if its value was unreadable.
    pub promo_price: Option<Decimal>,
    /// Image URLs in upstream order; only the first is used.
    pub images: Vec<String>,
    /// Units in stock; `None` means unknown, which counts as in stock.
    pub stock: Option<i64>,
}

impl CatalogItem {
    /// Whether this item is published. The comparison is an exact literal
    /// match; `Active`, `ACTIVE`, or absent are all excluded.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}
