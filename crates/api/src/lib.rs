//! Tamarind e-commerce backend library.
//!
//! Everything the binary wires together lives here so the HTTP surface can
//! be driven in tests with in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
