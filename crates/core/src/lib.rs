//! Shoe Store Core - Shared types library.
//!
//! This crate provides common types used across all shoe store components:
//! - `storefront` - Catalog, cart and checkout (library and HTTP binary)
//! - `cli` - Command-line tools for inspecting the catalog and order log
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, contact details, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
