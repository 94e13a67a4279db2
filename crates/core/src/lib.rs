//! Makhzan Core - Shared types and logic library.
//!
//! This crate provides the types and pure logic used across the Makhzan
//! components:
//! - `server` - HTTP API for products, custom fields, QR artifacts and scans
//! - `cli` - Command-line tools for migrations and QR round-trips
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Image decoding operates on byte
//! buffers handed in by the caller.
//!
//! # Modules
//!
//! - [`types`] - Products, custom-field definitions and newtype IDs
//! - [`qr`] - Deterministic QR encode/decode of product identifiers
//! - [`resolve`] - Payload-to-product resolution
//! - [`catalog`] - Catalog filtering and category facet aggregation
//! - [`scan`] - Capture-adapter contracts and the scan flow state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod qr;
pub mod resolve;
pub mod scan;
pub mod types;

pub use types::*;
