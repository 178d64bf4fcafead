//! Customer dashboard: latest laundry, payment status and rating.

use askama::Template;

use laundry_core::StarRating;

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::{LaundryRecord, RatingSubmission};
use crate::session::SessionStore;
use crate::storage::DurableStorage;

use super::{Notice, ViewEpoch};

#[derive(Debug, Template)]
#[template(path = "dashboard.txt")]
pub struct DashboardView {
    customer_name: String,
    latest: Option<LaundryRecord>,
    loading: bool,
    pub rating: StarRating,
    pub comment: String,
    pub notice: Option<Notice>,
    epoch: ViewEpoch,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            latest: None,
            loading: true,
            rating: StarRating::default(),
            comment: String::new(),
            notice: None,
            epoch: ViewEpoch::new(),
        }
    }
}

impl DashboardView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn epoch(&self) -> ViewEpoch {
        self.epoch.clone()
    }

    /// Fetch the customer's orders and keep the most recent one.
    pub async fn load<S: DurableStorage>(&mut self, api: &ApiClient, session: &SessionStore<S>) {
        let Some(customer) = session.customer() else {
            return;
        };
        self.customer_name = customer.display_name();
        let Some(identity) = session.identity() else {
            self.loading = false;
            return;
        };

        let ticket = self.epoch.begin();
        let result = api
            .customer_records(session.credentials(), identity.shop_id, identity.id)
            .await;
        if !self.epoch.accept(ticket, "dashboard") {
            return;
        }

        self.latest = match result {
            Ok(records) => latest_record(records),
            Err(e) => {
                tracing::error!(error = %e, "Error loading laundry status");
                None
            }
        };
        self.loading = false;
    }

    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&LaundryRecord> {
        self.latest.as_ref()
    }

    /// Payment state of the latest order.
    #[must_use]
    pub fn payment_status(&self) -> &'static str {
        match &self.latest {
            Some(record) if record.status.is_completed() => "PAID",
            Some(_) => "PENDING",
            None => "-",
        }
    }

    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.rating.can_submit() && self.latest.is_some()
    }

    /// Post the rating and comment for the latest order.
    ///
    /// The form is reset only when the shop accepts the rating.
    pub async fn submit_rating<S: DurableStorage>(
        &mut self,
        api: &ApiClient,
        session: &SessionStore<S>,
    ) -> Notice {
        let notice = self.try_submit(api, session).await;
        self.notice = Some(notice.clone());
        notice
    }

    async fn try_submit<S: DurableStorage>(
        &mut self,
        api: &ApiClient,
        session: &SessionStore<S>,
    ) -> Notice {
        if !self.rating.can_submit() {
            return Notice::error("Select a rating first");
        }
        let (Some(customer), Some(record)) = (session.identity(), &self.latest) else {
            return Notice::error("There is no laundry to rate yet");
        };

        let submission = RatingSubmission {
            laundry_id: record.laundry_id.clone(),
            rating: self.rating.value(),
            comment: self.comment.trim().to_string(),
        };
        match api
            .submit_rating(session.credentials(), customer, &submission)
            .await
        {
            Ok(()) => {
                let rating = submission.rating.to_string();
                add_breadcrumb(
                    "rating",
                    "Submitted rating",
                    Some(&[
                        ("laundry_id", submission.laundry_id.as_str()),
                        ("rating", rating.as_str()),
                    ]),
                );
                self.rating.reset();
                self.comment.clear();
                Notice::success("Thank you for your feedback!")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rating submission failed");
                Notice::error(e.user_message("Failed to submit rating. Please try again."))
            }
        }
    }
}

/// The most recently created record.
fn latest_record(records: Vec<LaundryRecord>) -> Option<LaundryRecord> {
    records.into_iter().max_by_key(|record| record.created_at)
}
