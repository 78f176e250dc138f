//! Tamarind Core - Shared types library.
//!
//! This crate provides common types used across all Tamarind components:
//! - `api` - The e-commerce backend (auth, catalog, cart)
//! - `integration-tests` - End-to-end flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
