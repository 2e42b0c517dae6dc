//! Vitrine Feedgen - Firestore-to-XML feed generation pipeline.
//!
//! # Architecture
//!
//! - `vitrine-core` holds all decision logic; this crate is the thin
//!   orchestration around it
//! - Firestore is read over its public REST API with `reqwest` - no SDK,
//!   no local sync
//! - One independent task per store with its own failure boundary; a
//!   broken store never blocks the others
//! - Feeds are fully materialized in memory before the single file write,
//!   so a crash cannot leave a half-written feed behind
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`firestore`] - REST client, wire-format document model, conversions
//! - [`pipeline`] - Per-store fan-out, eligibility, build, write
//! - [`output`] - Feed file output

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod firestore;
pub mod output;
pub mod pipeline;
