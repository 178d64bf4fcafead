//! Laundry customer portal client.
//!
//! This crate holds everything a customer-facing front end needs: the
//! persisted session, the typed shop API client, routing and the page views.
//! The `laundry` binary drives it from the command line.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod views;

pub use app::App;
pub use error::{AppError, Result};
