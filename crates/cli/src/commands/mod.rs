//! Command implementations.
//!
//! Commands print what the customer asked for on stdout. Diagnostics go
//! through `tracing` to stderr.

pub mod auth;
pub mod env;
pub mod pages;
pub mod payment;
pub mod profile;
pub mod rate;

use laundry_customer::views::Notice;
use laundry_customer::{App, AppError};

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}

/// Print a notice; an error notice fails the command.
pub fn finish(notice: Notice) -> laundry_customer::Result<()> {
    emit(&notice.to_string());
    if notice.is_error() {
        Err(AppError::BadRequest(notice.message))
    } else {
        Ok(())
    }
}

/// Dashboard commands need a logged-in customer.
pub fn require_session(app: &App) -> laundry_customer::Result<()> {
    if app.session().is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "not logged in; run `laundry login` first".to_string(),
        ))
    }
}
