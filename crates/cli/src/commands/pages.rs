//! Page rendering.

use laundry_customer::App;
use laundry_customer::routes::Page;

use super::emit;

/// Render any page by path.
pub async fn open(app: &App, path: &str) -> laundry_customer::Result<()> {
    emit(&app.render(path).await?);
    Ok(())
}

pub async fn history(app: &App) -> laundry_customer::Result<()> {
    open(app, Page::History.path()).await
}
