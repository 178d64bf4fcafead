//! Login, logout, registration and session inspection.

use secrecy::SecretString;

use laundry_customer::App;
use laundry_customer::session::Rehydration;
use laundry_customer::views::{LoginView, RegisterForm, RegisterView};

use super::{emit, finish};

pub async fn login(app: &mut App, email: String, password: SecretString) -> laundry_customer::Result<()> {
    let mut view = LoginView::new(app.config().shop_slug.as_deref());
    view.set_email(email);
    view.set_password(password);

    let (api, session) = app.api_and_session_mut();
    finish(view.submit(api, session).await)
}

/// Log out. Memory is cleared even if the stored keys cannot be removed.
pub fn logout(app: &mut App) -> laundry_customer::Result<()> {
    app.session_mut().logout()?;
    emit("Logged out.");
    Ok(())
}

pub fn whoami(app: &App) -> laundry_customer::Result<()> {
    if app.rehydration() == Rehydration::Wiped {
        emit("The stored session was unreadable and has been cleared.");
    }
    let session = app.session();
    match (session.customer(), session.identity()) {
        (Some(customer), Some(identity)) => emit(&format!(
            "{} (customer #{}, shop #{}, {})",
            customer.display_name(),
            identity.id,
            identity.shop_id,
            identity.role
        )),
        (Some(customer), None) => emit(&format!(
            "{} (account has no usable shop; log in again)",
            customer.display_name()
        )),
        (None, _) => emit("Not logged in."),
    }
    Ok(())
}

pub async fn register(app: &App, form: RegisterForm) -> laundry_customer::Result<()> {
    let mut view = RegisterView::new(app.config().shop_slug.as_deref());
    view.form = form;
    finish(view.submit(app.api()).await)
}
