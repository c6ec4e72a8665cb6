//! Seller Panel Core - Shared types library.
//!
//! This crate provides common types used across all Seller Panel components:
//! - `dashboard` - Session-aware API client, route guard and forms
//! - `cli` - Interactive console front-end for sellers
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere, including in the fake
//! backend used by integration tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
