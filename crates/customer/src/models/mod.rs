//! Typed records exchanged with the shop API.
//!
//! Every endpoint gets its own record so a payload with an unexpected shape
//! fails at the boundary with a descriptive serde error instead of surfacing
//! later as a missing field in a view.

mod auth;
mod customer;
mod order;
mod payment;
pub(crate) mod serde_helpers;

pub use auth::{AuthPayload, LoginRequest, RegisterRequest};
pub use customer::{Customer, CustomerProfile, CustomerUpdate, Identity};
pub use order::{LaundryRecord, RatingSubmission};
pub use payment::PaymentMethod;
