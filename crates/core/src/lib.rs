//! Ruche Core - Shared types library.
//!
//! This crate provides common types used across all La Ruche d'Or components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout)
//! - `admin` - Internal back-office panel
//! - `cli` - Command-line tools for seeding and connectivity checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the domain entities (products, orders,
//!   testimonials, promo codes)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
