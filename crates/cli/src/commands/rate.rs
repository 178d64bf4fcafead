//! Rating the latest laundry order.

use laundry_customer::App;
use laundry_customer::views::DashboardView;

use super::{finish, require_session};

pub async fn rate(app: &App, stars: u8, comment: String) -> laundry_customer::Result<()> {
    require_session(app)?;
    let mut view = DashboardView::new();
    view.load(app.api(), app.session()).await;

    view.rating.click(stars);
    view.comment = comment;
    finish(view.submit_rating(app.api(), app.session()).await)
}
