//! Page views.
//!
//! A view owns the ephemeral state of one page (form drafts, loading flags,
//! fetched rows) and renders itself through an askama text template. Views
//! borrow the session for the duration of a call and never keep it.
//!
//! Fetches are guarded by a [`ViewEpoch`]: a response is applied only if the
//! view was not re-mounted while the request was in flight.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

mod dashboard;
mod header;
mod history;
mod login;
mod marketing;
mod payment;
mod profile;
mod register;

pub use dashboard::DashboardView;
pub use header::{Header, NavLink};
pub use history::{HistoryRow, HistoryView, history_rows};
pub use login::LoginView;
pub use marketing::{AboutView, HomeView, PriceRow, PricesView, ServicesView};
pub use payment::{PaymentView, ProofError};
pub use profile::{DetailRow, ProfileField, ProfileView, detail_rows};
pub use register::{MIN_PASSWORD_LEN, RegisterError, RegisterForm, RegisterView};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Outcome of a user action, shown once to the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "[ok] {}", self.message),
            NoticeLevel::Error => write!(f, "[error] {}", self.message),
        }
    }
}

/// A fetch started under a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Mount generation of a view.
///
/// Clones share the counter, so a handle held elsewhere can invalidate the
/// view's in-flight fetches.
#[derive(Debug, Clone, Default)]
pub struct ViewEpoch {
    current: Arc<AtomicU64>,
}

impl ViewEpoch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket before awaiting a response.
    #[must_use]
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.load(Ordering::Acquire))
    }

    /// Whether a response fetched under `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::Acquire) == ticket.0
    }

    /// Invalidate every outstanding ticket.
    pub fn remount(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }

    /// Check a ticket, logging when the result is dropped.
    fn accept(&self, ticket: Ticket, view: &'static str) -> bool {
        let current = self.is_current(ticket);
        if !current {
            tracing::debug!(view, "Discarding response for a re-mounted view");
        }
        current
    }
}
