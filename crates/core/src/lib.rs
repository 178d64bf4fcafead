//! Laundry Core - Shared domain types.
//!
//! This crate provides the types shared by the laundry customer portal:
//! - `customer` - Session store, API client, router and views
//! - `cli` - The `laundry` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machines - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, email, peso amounts, statuses and the star rating

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
