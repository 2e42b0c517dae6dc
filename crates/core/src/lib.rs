//! Vitrine Core - Domain library for feed generation.
//!
//! This crate holds the two components with real decision logic:
//! - [`eligibility`] - the policy deciding whether a store's subscription
//!   authorizes feed generation
//! - [`feed`] - the transformation from catalog items into a Google
//!   Shopping compatible XML feed document
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no filesystem access. Everything here is deterministic: the same
//! inputs always produce the same decision or the same document. Fetching
//! documents and writing files is the `feedgen` binary's job.
//!
//! # Modules
//!
//! - [`types`] - Store configuration, catalog items, and prices
//! - [`eligibility`] - Plan/status admission policy with identity override
//! - [`feed`] - Feed construction and XML serialization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod eligibility;
pub mod feed;
pub mod types;

pub use eligibility::EligibilityPolicy;
pub use feed::{Availability, Feed, FeedEntry, FeedProfile};
pub use types::*;
