//! Conversions from Firestore documents to domain types.
//!
//! Every conversion is total: missing or malformed fields degrade to the
//! documented defaults instead of propagating an error, so one broken
//! document can never take down a store's whole feed.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use vitrine_core::{CatalogItem, StoreConfig, SubscriptionStatus};

use super::types::{FsDocument, FsValue};

/// Convert a `config/store` document into a [`StoreConfig`].
///
/// Plan information is read from both the nested `plan` object and the
/// top-level fields; the eligibility policy decides the precedence.
#[must_use]
pub fn store_config(doc: &FsDocument) -> StoreConfig {
    let plan = doc.field("plan");

    StoreConfig {
        store_name: text(doc.field("storeName")),
        subscription_status: doc
            .field("subscriptionStatus")
            .and_then(FsValue::as_str)
            .map(SubscriptionStatus::parse)
            .unwrap_or_default(),
        plan_id: text(plan.and_then(|p| p.field("planId"))),
        plan_name: text(plan.and_then(|p| p.field("planName"))),
        legacy_plan_id: text(doc.field("planId")),
        legacy_plan_name: text(doc.field("planName")),
    }
}

/// Convert a product document into a [`CatalogItem`].
#[must_use]
pub fn catalog_item(doc: &FsDocument) -> CatalogItem {
    CatalogItem {
        id: doc.doc_id().to_string(),
        name: text(doc.field("name")),
        description: text(doc.field("description")),
        status: text(doc.field("status")),
        price: doc.field("value").and_then(numeric),
        // A present promo field always yields Some, even when its value is
        // unreadable; the feed then renders 0.00 rather than dropping the
        // sale price element the merchant asked for.
        promo_price: doc
            .field("promoValue")
            .map(|value| numeric(value).unwrap_or_default()),
        images: doc
            .field("images")
            .map(|value| {
                value
                    .items()
                    .iter()
                    .filter_map(FsValue::as_str)
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        stock: doc.field("stock").and_then(FsValue::as_i64),
    }
}

fn text(value: Option<&FsValue>) -> Option<String> {
    value.and_then(FsValue::as_str).map(ToString::to_string)
}

/// First numeric source wins: `doubleValue`, then `integerValue`.
fn numeric(value: &FsValue) -> Option<Decimal> {
    value
        .as_f64()
        .and_then(Decimal::from_f64)
        .or_else(|| value.as_i64().map(Decimal::from))
}
