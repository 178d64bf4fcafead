//! Application context shared by every command.

use askama::Template;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::routes::{self, Page};
use crate::session::{Rehydration, SessionStore};
use crate::storage::FileStorage;
use crate::views::{
    AboutView, DashboardView, Header, HistoryView, HomeView, LoginView, PaymentView,
    PricesView, ProfileView, RegisterView, ServicesView,
};

/// Configuration, session and API client, created once at start.
pub struct App {
    config: ClientConfig,
    session: SessionStore<FileStorage>,
    api: ApiClient,
    rehydration: Rehydration,
}

impl App {
    /// Build the context and rehydrate the session from the state directory.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let mut session = SessionStore::new(FileStorage::new(config.storage_path()));
        let rehydration = session.initialize();
        tracing::debug!(?rehydration, path = %config.storage_path().display(), "Session rehydrated");

        Ok(Self {
            config,
            session,
            api,
            rehydration,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore<FileStorage> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut SessionStore<FileStorage> {
        &mut self.session
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The API client alongside a mutable session, for login.
    pub const fn api_and_session_mut(&mut self) -> (&ApiClient, &mut SessionStore<FileStorage>) {
        (&self.api, &mut self.session)
    }

    /// What start-up rehydration found in storage.
    #[must_use]
    pub const fn rehydration(&self) -> Rehydration {
        self.rehydration
    }

    /// Shop slug for links: the one in the path, else the configured one.
    fn slug<'a>(&'a self, from_path: Option<&'a str>) -> Option<&'a str> {
        from_path.or(self.config.shop_slug.as_deref())
    }

    /// Render the page at `path`, with the header when the page shows one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown paths, `Unauthorized` for dashboard
    /// pages without a session, and `Render` if a template fails.
    pub async fn render(&self, path: &str) -> Result<String> {
        let route = routes::resolve(path).ok_or_else(|| AppError::NotFound(path.to_string()))?;
        if route.page.requires_session() && !self.session.is_authenticated() {
            return Err(AppError::Unauthorized(format!(
                "log in to view {}",
                route.page.title()
            )));
        }

        let slug = self.slug(route.shop_slug.as_deref());
        let body = self.render_page(route.page, slug).await?;

        if routes::shows_header(path) {
            let header = Header::new(slug, self.session.is_authenticated()).render()?;
            Ok(format!("{header}\n\n{body}"))
        } else {
            Ok(body)
        }
    }

    async fn render_page(&self, page: Page, slug: Option<&str>) -> Result<String> {
        let (api, session) = (&self.api, &self.session);
        let rendered = match page {
            Page::Home => HomeView::new(slug).render()?,
            Page::About => AboutView::new(Header::new(slug, false).brand).render()?,
            Page::Services => ServicesView::default().render()?,
            Page::Prices => PricesView::default().render()?,
            Page::Login => LoginView::new(slug).render()?,
            Page::Register => RegisterView::new(slug).render()?,
            Page::Dashboard => {
                let mut view = DashboardView::new();
                view.load(api, session).await;
                view.render()?
            }
            Page::Profile => {
                let mut view = ProfileView::new();
                view.load(api, session).await;
                view.render()?
            }
            Page::History => {
                let mut view = HistoryView::new();
                view.load(api, session).await;
                view.render()?
            }
            Page::Payment => {
                let mut view = PaymentView::new();
                view.load(api, session).await;
                view.render()?
            }
        };
        Ok(rendered)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("api_url", &self.api.base_url())
            .field("session", &self.session)
            .field("rehydration", &self.rehydration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn app(dir: &std::path::Path, slug: Option<&str>) -> App {
        let state_dir = dir.display().to_string();
        let slug = slug.map(str::to_string);
        let config = ClientConfig::from_lookup(move |key| match key {
            "LAUNDRY_API_URL" => Some("http://127.0.0.1:9".to_string()),
            "LAUNDRY_STATE_DIR" => Some(state_dir.clone()),
            "LAUNDRY_SHOP_SLUG" => slug.clone(),
            _ => None,
        })
        .unwrap();
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_empty_state_dir_rehydrates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), None);
        assert_eq!(app.rehydration(), Rehydration::Empty);
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_unreadable_store_reports_wiped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FileStorage::FILE_NAME), "{\"token\": ").unwrap();

        let app = app(dir.path(), None);
        assert_eq!(app.rehydration(), Rehydration::Wiped);
        assert!(app.session().token().is_none());
        assert_eq!(
            std::fs::read_to_string(app.config().storage_path()).unwrap().trim(),
            "{}"
        );
    }

    #[tokio::test]
    async fn test_public_page_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = app(dir.path(), Some("sudsy")).render("/prices").await.unwrap();
        assert!(rendered.starts_with("== SUDSY =="));
        assert!(rendered.contains("/sudsy/login"));
        assert!(rendered.contains("Wash & Fold"));
    }

    #[tokio::test]
    async fn test_login_page_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = app(dir.path(), None).render("/login").await.unwrap();
        assert!(rendered.starts_with("LOGIN"));
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let err = app(dir.path(), None)
            .render("/dashboard/history")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = app(dir.path(), None).render("/laundromat/x").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(path) if path == "/laundromat/x"));
    }
}
