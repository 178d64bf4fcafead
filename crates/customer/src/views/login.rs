//! Login form.

use askama::Template;
use secrecy::{ExposeSecret, SecretString};

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::LoginRequest;
use crate::routes::Page;
use crate::session::SessionStore;
use crate::storage::DurableStorage;

use super::Notice;

#[derive(Debug, Default, Template)]
#[template(path = "login.txt")]
pub struct LoginView {
    pub email: String,
    password: Option<SecretString>,
    pub notice: Option<Notice>,
    pub register_href: String,
}

impl LoginView {
    #[must_use]
    pub fn new(shop_slug: Option<&str>) -> Self {
        Self {
            register_href: Page::Register.link(shop_slug),
            ..Self::default()
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.password = Some(password);
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|password| !password.expose_secret().is_empty())
    }

    /// Log in with the entered credentials.
    ///
    /// On success the session holds the returned customer, token and API key.
    /// Any failure leaves the session as it was.
    pub async fn submit<S: DurableStorage>(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore<S>,
    ) -> Notice {
        let notice = self.attempt(api, session).await;
        self.notice = Some(notice.clone());
        notice
    }

    async fn attempt<S: DurableStorage>(
        &self,
        api: &ApiClient,
        session: &mut SessionStore<S>,
    ) -> Notice {
        let email = self.email.trim();
        let password = match &self.password {
            Some(password) if self.has_password() && !email.is_empty() => password.clone(),
            _ => return Notice::error("Email and password are required"),
        };

        let request = LoginRequest {
            email: email.to_string(),
            password,
        };
        let payload = match api.login(&request).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                return Notice::error(e.user_message("Login failed, please try again"));
            }
        };

        let name = payload.customer.display_name();
        if let Err(e) = session.login(payload.customer, payload.token, payload.api_key) {
            tracing::error!(error = %e, "Failed to persist session");
            return Notice::error("Login failed: the session could not be saved");
        }

        add_breadcrumb("auth", "Logged in", None);
        Notice::success(format!("Welcome back, {name}!"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::ClientConfig;
    use crate::storage::MemoryStorage;

    use super::*;

    fn api() -> ApiClient {
        let config = ClientConfig::from_lookup(|key| match key {
            "LAUNDRY_API_URL" => Some("http://127.0.0.1:9".to_string()),
            "LAUNDRY_STATE_DIR" => Some("/tmp/laundry-test".to_string()),
            _ => None,
        })
        .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_missing_password_rejected_before_request() {
        let mut session = SessionStore::new(MemoryStorage::new());
        let mut view = LoginView::new(None);
        view.set_email("angie@example.ph");

        let notice = view.submit(&api(), &mut session).await;
        assert!(notice.is_error());
        assert_eq!(notice.message, "Email and password are required");
        assert!(!session.is_authenticated());
        assert!(session.storage().is_empty());
    }

    #[tokio::test]
    async fn test_blank_email_rejected() {
        let mut session = SessionStore::new(MemoryStorage::new());
        let mut view = LoginView::new(None);
        view.set_email("   ");
        view.set_password(SecretString::from("hunter22"));

        let notice = view.submit(&api(), &mut session).await;
        assert!(notice.is_error());
        assert_eq!(view.notice, Some(notice));
    }

    #[test]
    fn test_login_renders_notice() {
        let mut view = LoginView::new(None);
        view.set_email("angie@example.ph");
        view.notice = Some(Notice::error("Invalid credentials"));

        let rendered = view.render().unwrap();
        assert!(rendered.contains("angie@example.ph"));
        assert!(rendered.contains("[error] Invalid credentials"));
        assert!(rendered.contains("/register"));
        assert!(rendered.contains("Password: (not set)"));
    }
}
