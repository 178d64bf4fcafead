//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything the client surface can
//! fail with, plus helpers that keep the Sentry scope in step with the
//! session.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type for the customer client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// No page is registered for the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The page needs a logged-in customer.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error points at a defect or outage rather than user input.
    ///
    /// Only these are captured to Sentry.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Session(_) | Self::Render(_) | Self::Api(_)
        )
    }

    /// Log the error, capturing internal ones to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Command error");
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Called when a session is established or restored.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a customer action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("profile", "Saved profile", Some(&[("customer_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("/laundromat".to_string());
        assert_eq!(err.to_string(), "Not found: /laundromat");

        let err = AppError::Unauthorized("log in first".to_string());
        assert_eq!(err.to_string(), "Unauthorized: log in first");
    }

    #[test]
    fn test_internal_classification() {
        assert!(AppError::Storage(StorageError::Poisoned).is_internal());
        assert!(!AppError::BadRequest("x".to_string()).is_internal());
        assert!(!AppError::Unauthorized("x".to_string()).is_internal());
    }
}
