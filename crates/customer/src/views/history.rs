//! Past laundry orders.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::models::LaundryRecord;
use crate::session::SessionStore;
use crate::storage::DurableStorage;

use super::ViewEpoch;

/// One order as listed in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    /// Short date, e.g. `Mar 05`.
    pub date: String,
    pub service: String,
    pub amount: String,
    pub status: String,
    created_at: DateTime<Utc>,
}

impl From<&LaundryRecord> for HistoryRow {
    fn from(record: &LaundryRecord) -> Self {
        Self {
            id: record.laundry_id.clone(),
            date: record.created_at.format("%b %d").to_string(),
            service: record.service_label(),
            amount: record.total_amount.to_string(),
            status: record.status.label().to_string(),
            created_at: record.created_at,
        }
    }
}

/// Rows for `records`, latest first.
#[must_use]
pub fn history_rows(records: &[LaundryRecord]) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = records.iter().map(HistoryRow::from).collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[derive(Debug, Template)]
#[template(path = "history.txt")]
pub struct HistoryView {
    rows: Vec<HistoryRow>,
    loading: bool,
    epoch: ViewEpoch,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            loading: true,
            epoch: ViewEpoch::new(),
        }
    }
}

impl HistoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn epoch(&self) -> ViewEpoch {
        self.epoch.clone()
    }

    /// Fetch the customer's orders.
    ///
    /// Any failure, including a rejected request, shows an empty history.
    /// Without a customer nothing is fetched and the view stays loading.
    pub async fn load<S: DurableStorage>(&mut self, api: &ApiClient, session: &SessionStore<S>) {
        let Some(customer) = session.identity() else {
            return;
        };

        let ticket = self.epoch.begin();
        let result = api
            .customer_records(session.credentials(), customer.shop_id, customer.id)
            .await;
        if !self.epoch.accept(ticket, "history") {
            return;
        }

        self.rows = match result {
            Ok(records) => history_rows(&records),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching customer history");
                Vec::new()
            }
        };
        self.loading = false;
    }

    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}
