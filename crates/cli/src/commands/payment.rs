//! Payment commands.

use std::path::Path;

use askama::Template;

use laundry_core::PaymentOption;
use laundry_customer::views::PaymentView;
use laundry_customer::{App, AppError};

use super::{emit, require_session};

async fn loaded(app: &App) -> laundry_customer::Result<PaymentView> {
    require_session(app)?;
    let mut view = PaymentView::new();
    view.load(app.api(), app.session()).await;
    Ok(view)
}

pub async fn methods(app: &App) -> laundry_customer::Result<()> {
    emit(&loaded(app).await?.render()?);
    Ok(())
}

pub async fn select(app: &App, option: &str, proof: Option<&Path>) -> laundry_customer::Result<()> {
    let mut view = loaded(app).await?;

    if !view.select(PaymentOption::from_name(option)) {
        let offered: Vec<String> = view
            .options()
            .iter()
            .map(|option| option.key().to_string())
            .collect();
        return Err(AppError::BadRequest(format!(
            "`{option}` is not offered; choose one of: {}",
            offered.join(", ")
        )));
    }

    if let Some(path) = proof {
        view.choose_proof(path)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    emit(&view.render()?);
    Ok(())
}
