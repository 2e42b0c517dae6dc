//! Domain types shared by the eligibility policy and the feed builder.

mod catalog;
mod config;
mod price;

pub use catalog::CatalogItem;
pub use config::{StoreConfig, SubscriptionStatus};
pub use price::{CurrencyCode, Price};
