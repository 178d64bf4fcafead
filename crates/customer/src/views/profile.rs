//! Profile details with an edit-then-save flow.
//!
//! ```text
//! viewing ──start_editing()──▶ editing ──save() ok──▶ viewing (details = draft)
//!    ▲                           │  │
//!    └────cancel_editing()───────┘  └─save() failed─▶ editing (draft kept)
//! ```

use askama::Template;

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::{CustomerProfile, CustomerUpdate};
use crate::session::SessionStore;
use crate::storage::DurableStorage;

use super::{Notice, ViewEpoch};

/// A row of the profile card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    Email,
    Phone,
    Address,
    MemberSince,
    CompletedOrders,
    PreferredService,
    PaymentPreference,
}

impl ProfileField {
    /// Rows in display order.
    pub const ALL: [Self; 8] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::MemberSince,
        Self::CompletedOrders,
        Self::PreferredService,
        Self::PaymentPreference,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Delivery address",
            Self::MemberSince => "Member since",
            Self::CompletedOrders => "Completed orders",
            Self::PreferredService => "Preferred service",
            Self::PaymentPreference => "Payment preference",
        }
    }
}

/// A labelled profile value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub field: ProfileField,
    pub value: String,
}

impl DetailRow {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.field.label()
    }
}

/// Build the eight detail rows from a fetched profile.
#[must_use]
pub fn detail_rows(profile: &CustomerProfile) -> Vec<DetailRow> {
    ProfileField::ALL
        .into_iter()
        .map(|field| {
            let value = match field {
                ProfileField::FullName => profile.full_name(),
                ProfileField::Email => profile.email.clone(),
                ProfileField::Phone => profile.contact_number.clone(),
                ProfileField::Address => profile.address.clone(),
                ProfileField::MemberSince => profile.date_registered.format("%B %Y").to_string(),
                ProfileField::CompletedOrders => "0".to_string(),
                ProfileField::PreferredService | ProfileField::PaymentPreference => {
                    "N/A".to_string()
                }
            };
            DetailRow { field, value }
        })
        .collect()
}

#[derive(Debug, Template)]
#[template(path = "profile.txt")]
pub struct ProfileView {
    details: Vec<DetailRow>,
    draft: Vec<DetailRow>,
    editing: bool,
    loading: bool,
    pub notice: Option<Notice>,
    epoch: ViewEpoch,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self {
            details: Vec::new(),
            draft: Vec::new(),
            editing: false,
            loading: true,
            notice: None,
            epoch: ViewEpoch::new(),
        }
    }
}

impl ProfileView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle used to invalidate in-flight fetches.
    #[must_use]
    pub fn epoch(&self) -> ViewEpoch {
        self.epoch.clone()
    }

    /// Fetch the profile of the logged-in customer.
    ///
    /// Without a customer nothing is fetched. A failed fetch leaves the rows
    /// empty. Either way loading ends.
    pub async fn load<S: DurableStorage>(&mut self, api: &ApiClient, session: &SessionStore<S>) {
        let Some(customer) = session.identity() else {
            self.loading = false;
            return;
        };

        let ticket = self.epoch.begin();
        let result = api.get_customer(session.credentials(), customer).await;
        if !self.epoch.accept(ticket, "profile") {
            return;
        }

        match result {
            Ok(profile) => {
                self.details = detail_rows(&profile);
                self.draft = self.details.clone();
            }
            Err(e) => tracing::error!(error = %e, "Error loading profile"),
        }
        self.loading = false;
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Saved rows.
    #[must_use]
    pub fn details(&self) -> &[DetailRow] {
        &self.details
    }

    /// Rows on screen: the draft while editing, else the saved rows.
    #[must_use]
    pub fn visible(&self) -> &[DetailRow] {
        if self.editing { &self.draft } else { &self.details }
    }

    pub fn start_editing(&mut self) {
        self.draft = self.details.clone();
        self.editing = true;
    }

    pub fn cancel_editing(&mut self) {
        self.draft = self.details.clone();
        self.editing = false;
    }

    /// Change one draft value. Ignored outside edit mode.
    ///
    /// Returns whether the draft changed.
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) -> bool {
        if !self.editing {
            return false;
        }
        match self.draft.iter_mut().find(|row| row.field == field) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    fn draft_value(&self, field: ProfileField) -> &str {
        self.draft
            .iter()
            .find(|row| row.field == field)
            .map_or("", |row| row.value.as_str())
    }

    /// Request body for the current draft.
    #[must_use]
    pub fn update_payload(&self) -> CustomerUpdate {
        let (first_name, middle_name, last_name) =
            CustomerUpdate::split_full_name(self.draft_value(ProfileField::FullName));
        CustomerUpdate {
            first_name,
            middle_name,
            last_name,
            address: self.draft_value(ProfileField::Address).to_string(),
            contact_number: self.draft_value(ProfileField::Phone).to_string(),
            email: self.draft_value(ProfileField::Email).to_string(),
        }
    }

    /// Send the draft to the shop.
    ///
    /// On success the draft becomes the saved rows and edit mode ends. On
    /// failure the view stays in edit mode with the draft intact.
    pub async fn save<S: DurableStorage>(
        &mut self,
        api: &ApiClient,
        session: &SessionStore<S>,
    ) -> Notice {
        let notice = self.try_save(api, session).await;
        self.notice = Some(notice.clone());
        notice
    }

    async fn try_save<S: DurableStorage>(
        &mut self,
        api: &ApiClient,
        session: &SessionStore<S>,
    ) -> Notice {
        const FAILED: &str = "Failed to update profile. Please try again.";

        if !self.editing {
            return Notice::error("Nothing to save");
        }
        let Some(customer) = session.identity() else {
            return Notice::error(FAILED);
        };

        let payload = self.update_payload();
        let ticket = self.epoch.begin();
        let result = api
            .update_customer(session.credentials(), customer, &payload)
            .await;
        if !self.epoch.accept(ticket, "profile") {
            return Notice::error(FAILED);
        }

        match result {
            Ok(()) => {
                self.details = self.draft.clone();
                self.editing = false;
                let id = customer.id.to_string();
                add_breadcrumb("profile", "Saved profile", Some(&[("customer_id", id.as_str())]));
                Notice::success("Profile updated successfully!")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile update failed");
                Notice::error(FAILED)
            }
        }
    }
}
