//! Profile commands.

use askama::Template;

use laundry_customer::views::{ProfileField, ProfileView};
use laundry_customer::{App, AppError};

use super::{emit, finish, require_session};

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct Changes {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Changes {
    fn fields(self) -> impl Iterator<Item = (ProfileField, String)> {
        [
            (ProfileField::FullName, self.full_name),
            (ProfileField::Email, self.email),
            (ProfileField::Phone, self.phone),
            (ProfileField::Address, self.address),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }
}

async fn loaded(app: &App) -> laundry_customer::Result<ProfileView> {
    require_session(app)?;
    let mut view = ProfileView::new();
    view.load(app.api(), app.session()).await;
    Ok(view)
}

pub async fn show(app: &App) -> laundry_customer::Result<()> {
    emit(&loaded(app).await?.render()?);
    Ok(())
}

pub async fn edit(app: &App, changes: Changes) -> laundry_customer::Result<()> {
    let mut view = loaded(app).await?;
    if view.details().is_empty() {
        return Err(AppError::BadRequest(
            "profile could not be loaded".to_string(),
        ));
    }

    view.start_editing();
    let mut changed = false;
    for (field, value) in changes.fields() {
        changed |= view.set_field(field, value);
    }
    if !changed {
        return Err(AppError::BadRequest("nothing to change".to_string()));
    }

    let notice = view.save(app.api(), app.session()).await;
    if !notice.is_error() {
        emit(&view.render()?);
    }
    finish(notice)
}
