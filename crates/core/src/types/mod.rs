//! Core types for the laundry portal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod email;
pub mod id;
pub mod rating;
pub mod status;

pub use amount::Amount;
pub use email::{Email, EmailError};
pub use id::*;
pub use rating::StarRating;
pub use status::*;
