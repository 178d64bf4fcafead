//! Payment option and proof of payment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use askama::Template;
use thiserror::Error;

use laundry_core::PaymentOption;

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::PaymentMethod;
use crate::session::SessionStore;
use crate::storage::DurableStorage;

use super::ViewEpoch;

/// File extensions accepted as a proof image.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Reasons a proof file is refused.
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("Select GCash/PayMaya to upload")]
    CashSelected,

    #[error("File not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Not an image file: {}", .0.display())]
    NotImage(PathBuf),
}

#[derive(Debug, Template)]
#[template(path = "payment.txt")]
pub struct PaymentView {
    methods: Arc<Vec<PaymentMethod>>,
    option: PaymentOption,
    proof: Option<PathBuf>,
    epoch: ViewEpoch,
}

impl Default for PaymentView {
    fn default() -> Self {
        Self {
            methods: Arc::new(Vec::new()),
            option: PaymentOption::Cash,
            proof: None,
            epoch: ViewEpoch::new(),
        }
    }
}

impl PaymentView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn epoch(&self) -> ViewEpoch {
        self.epoch.clone()
    }

    /// Fetch the shop's displayed payment methods.
    ///
    /// On failure only cash is offered.
    pub async fn load<S: DurableStorage>(&mut self, api: &ApiClient, session: &SessionStore<S>) {
        let Some(customer) = session.identity() else {
            return;
        };

        let ticket = self.epoch.begin();
        let result = api
            .payment_methods(session.credentials(), customer.shop_id)
            .await;
        if !self.epoch.accept(ticket, "payment") {
            return;
        }

        match result {
            Ok(methods) => self.methods = methods,
            Err(e) => tracing::error!(error = %e, "Error loading payment methods"),
        }
    }

    #[must_use]
    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    /// Cash followed by one option per displayed method.
    #[must_use]
    pub fn options(&self) -> Vec<PaymentOption> {
        std::iter::once(PaymentOption::Cash)
            .chain(self.methods.iter().map(PaymentMethod::option))
            .collect()
    }

    #[must_use]
    pub const fn selected(&self) -> &PaymentOption {
        &self.option
    }

    /// Select an offered option. Returns `false` if the shop does not offer it.
    pub fn select(&mut self, option: PaymentOption) -> bool {
        if !self.options().contains(&option) {
            return false;
        }
        tracing::debug!(option = option.key(), "Payment option selected");
        self.option = option;
        true
    }

    /// The method whose details are shown for the selected option.
    #[must_use]
    pub fn selected_method(&self) -> Option<&PaymentMethod> {
        self.methods
            .iter()
            .find(|method| method.option() == self.option)
    }

    /// Attach a proof image.
    ///
    /// # Errors
    ///
    /// Returns `ProofError` if cash is selected, the file does not exist, or
    /// it is not an image.
    pub fn choose_proof(&mut self, path: impl AsRef<Path>) -> Result<(), ProofError> {
        let path = path.as_ref();
        if !self.option.accepts_proof() {
            return Err(ProofError::CashSelected);
        }
        if !path.is_file() {
            return Err(ProofError::Missing(path.to_path_buf()));
        }
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !is_image {
            return Err(ProofError::NotImage(path.to_path_buf()));
        }

        add_breadcrumb("payment", "Proof selected", Some(&[("option", self.option.key())]));
        self.proof = Some(path.to_path_buf());
        Ok(())
    }

    #[must_use]
    pub fn proof(&self) -> Option<&Path> {
        self.proof.as_deref()
    }

    #[must_use]
    pub fn proof_name(&self) -> Option<String> {
        self.proof
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    #[must_use]
    pub const fn upload_enabled(&self) -> bool {
        self.option.accepts_proof()
    }

    #[must_use]
    pub const fn status_line(&self) -> &'static str {
        if self.proof.is_some() {
            "File selected"
        } else {
            "Proof Uploaded"
        }
    }

    #[must_use]
    pub const fn upload_label(&self) -> &'static str {
        if !self.option.accepts_proof() {
            "Select GCash/PayMaya to upload"
        } else if self.proof.is_some() {
            "Change Image"
        } else {
            "Upload Image"
        }
    }

    /// Proof can be submitted once an electronic option and a file are chosen.
    #[must_use]
    pub const fn can_submit_proof(&self) -> bool {
        self.option.accepts_proof() && self.proof.is_some()
    }
}
