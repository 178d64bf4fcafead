//! Registration form.

use askama::Template;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use laundry_core::{Email, EmailError};

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::RegisterRequest;
use crate::routes::Page;

use super::Notice;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reasons a registration form cannot be submitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Values entered in the registration form.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub password: Option<SecretString>,
    pub password_confirm: Option<SecretString>,
}

impl RegisterForm {
    /// Check the form and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<RegisterRequest, RegisterError> {
        let required = [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Email", &self.email),
            ("Contact number", &self.contact_number),
            ("Address", &self.address),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(RegisterError::Required(*field));
        }

        let email = Email::parse(&self.email)?;

        let password = self
            .password
            .as_ref()
            .filter(|password| !password.expose_secret().is_empty())
            .ok_or(RegisterError::Required("Password"))?;
        if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(RegisterError::PasswordTooShort);
        }
        let confirmed = self
            .password_confirm
            .as_ref()
            .is_some_and(|confirm| confirm.expose_secret() == password.expose_secret());
        if !confirmed {
            return Err(RegisterError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            shop_id: None,
            first_name: self.first_name.trim().to_string(),
            middle_name: self.middle_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: email.as_str().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            address: self.address.trim().to_string(),
            password: password.clone(),
        })
    }
}

#[derive(Debug, Default, Template)]
#[template(path = "register.txt")]
pub struct RegisterView {
    pub form: RegisterForm,
    pub notice: Option<Notice>,
    pub login_href: String,
}

impl RegisterView {
    #[must_use]
    pub fn new(shop_slug: Option<&str>) -> Self {
        Self {
            login_href: Page::Login.link(shop_slug),
            ..Self::default()
        }
    }

    /// Validate the form and create the account.
    ///
    /// The form is cleared after a successful registration.
    pub async fn submit(&mut self, api: &ApiClient) -> Notice {
        let notice = match self.form.validate() {
            Err(e) => Notice::error(e.to_string()),
            Ok(request) => match api.register(&request).await {
                Ok(()) => {
                    add_breadcrumb("auth", "Registered", None);
                    tracing::info!(email = %request.email, "Customer registered");
                    self.form = RegisterForm::default();
                    Notice::success("Account created. You can now log in.")
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Registration failed");
                    Notice::error(e.user_message("Registration failed, please try again"))
                }
            },
        };
        self.notice = Some(notice.clone());
        notice
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> RegisterForm {
        RegisterForm {
            first_name: "Angie".into(),
            middle_name: String::new(),
            last_name: "Gabiana".into(),
            email: " angie@example.ph ".into(),
            contact_number: "09171234567".into(),
            address: "Cebu City".into(),
            password: Some(SecretString::from("laundry123")),
            password_confirm: Some(SecretString::from("laundry123")),
        }
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = filled().validate().unwrap();
        assert_eq!(request.email, "angie@example.ph");
        assert_eq!(request.middle_name, "");
        assert_eq!(request.password.expose_secret(), "laundry123");
    }

    #[test]
    fn test_required_fields_in_order() {
        let mut form = filled();
        form.last_name = "  ".into();
        form.address = String::new();
        assert_eq!(form.validate().unwrap_err(), RegisterError::Required("Last name"));
    }

    #[test]
    fn test_invalid_email() {
        let mut form = filled();
        form.email = "angie.example.ph".into();
        assert!(matches!(form.validate(), Err(RegisterError::Email(_))));
    }

    #[test]
    fn test_password_rules() {
        let mut form = filled();
        form.password = Some(SecretString::from("short"));
        assert_eq!(form.validate().unwrap_err(), RegisterError::PasswordTooShort);

        let mut form = filled();
        form.password_confirm = Some(SecretString::from("laundry124"));
        assert_eq!(form.validate().unwrap_err(), RegisterError::PasswordMismatch);

        let mut form = filled();
        form.password = None;
        assert_eq!(form.validate().unwrap_err(), RegisterError::Required("Password"));
    }

    #[test]
    fn test_render_lists_fields() {
        let mut view = RegisterView::new(Some("sudsy"));
        view.form = filled();
        view.notice = Some(Notice::error("Passwords do not match"));

        let rendered = view.render().unwrap();
        assert!(rendered.contains("First name:     Angie"));
        assert!(rendered.contains("/sudsy/login"));
        assert!(!rendered.contains("laundry123"));
    }
}
