//! Approve and reject actions on pending products.

use mktadmin_core::CanonicalProduct;

use crate::client::AdminClient;
use crate::error::ApiError;

/// Validation message for a blank rejection reason.
pub const REJECTION_REASON_REQUIRED: &str = "Please provide a reason for rejection";

/// Fails with [`ApiError::Validation`] when `reason` is blank.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] carrying [`REJECTION_REASON_REQUIRED`].
pub fn validate_rejection_reason(reason: &str) -> Result<(), ApiError> {
    if reason.trim().is_empty() {
        return Err(ApiError::Validation(REJECTION_REASON_REQUIRED.to_owned()));
    }
    Ok(())
}

/// Result of a successful review action.
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Confirmation message from the server, if it sent one.
    pub message: Option<String>,
    /// The product as re-read after the action; `None` if the refresh failed.
    pub product: Option<CanonicalProduct>,
}

/// Runs review actions and re-reads the product afterwards.
#[derive(Debug, Clone, Copy)]
pub struct ProductReviewer<'a> {
    client: &'a AdminClient,
}

impl<'a> ProductReviewer<'a> {
    #[must_use]
    pub fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// Approves the product with id `id`.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`AdminClient::approve_product`]; a failed refresh
    /// is not an error.
    pub async fn approve(&self, id: &str) -> Result<ReviewOutcome, ApiError> {
        let message = self.client.approve_product(id).await?;
        tracing::info!(product_id = id, "product approved");
        Ok(self.outcome(id, message).await)
    }

    /// Rejects the product with id `id`. A blank `reason` fails before any
    /// request is sent.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for a blank reason.
    /// - errors of [`AdminClient::reject_product`].
    pub async fn reject(&self, id: &str, reason: &str) -> Result<ReviewOutcome, ApiError> {
        validate_rejection_reason(reason)?;
        let message = self.client.reject_product(id, reason).await?;
        tracing::info!(product_id = id, "product rejected");
        Ok(self.outcome(id, message).await)
    }

    async fn outcome(&self, id: &str, message: Option<String>) -> ReviewOutcome {
        let product = match self.client.fetch_pending_product(id).await {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(product_id = id, error = %e, "could not refresh product after review");
                None
            }
        };
        ReviewOutcome { message, product }
    }
}
