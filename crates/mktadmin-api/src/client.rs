//! HTTP client for the marketplace admin API.
//!
//! Wraps `reqwest` with bearer authentication, status mapping, and shape-aware
//! product decoding. Requests are never retried.

mod credentials;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mktadmin_core::{AppConfig, CanonicalProduct};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;

pub use credentials::{CredentialProvider, NoCredentials, StaticToken};

use crate::controller::ProductSource;
use crate::error::ApiError;
use crate::extract::RawProduct;
use crate::listing::{assemble_page, ListingKind, ListingPage, ListingQuery};
use crate::normalize::normalize_product;
use crate::review::validate_rejection_reason;
use crate::shape::detect_record_shape;
use crate::types::{FilterOption, FilterOptions};

/// Which review queue a single-product lookup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductQueue {
    Approved,
    Pending,
}

impl ProductQueue {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Approved => "get-one-approved-product",
            Self::Pending => "get-one-pending-product",
        }
    }
}

/// Status handling for a request. Detail lookups and mutations treat 401 and
/// 404 as a dead session; listings report them like any other failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusPolicy {
    Listing,
    SessionScoped,
}

/// Client for the marketplace admin API.
///
/// Use [`AdminClient::from_config`] in the binary, or [`AdminClient::new`]
/// to point at a mock server in tests.
pub struct AdminClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joined paths land under any prefix.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", parsed.scheme())));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            credentials,
        })
    }

    /// Creates a client from loaded configuration. A configured token is sent
    /// as a static bearer token.
    ///
    /// # Errors
    ///
    /// See [`AdminClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let credentials: Arc<dyn CredentialProvider> = match &config.api_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(NoCredentials),
        };
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            credentials,
        )
    }

    /// Fetches one page of a listing and assembles it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status, carrying the
    ///   server's `message` when present.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not JSON.
    pub async fn fetch_listing(
        &self,
        kind: ListingKind,
        query: &ListingQuery,
    ) -> Result<ListingPage, ApiError> {
        let url = self.listing_url(kind, query);
        let body = self
            .send(Method::GET, url, None, StatusPolicy::Listing)
            .await?;
        Ok(assemble_page(kind, &body))
    }

    /// Fetches a single approved product.
    ///
    /// # Errors
    ///
    /// - [`ApiError::SessionInvalid`] on 401 or 404.
    /// - [`ApiError::Normalization`] if the response carries no product.
    /// - any error of [`AdminClient::fetch_listing`].
    pub async fn fetch_approved_product(&self, id: &str) -> Result<CanonicalProduct, ApiError> {
        self.fetch_product(ProductQueue::Approved, id).await
    }

    /// Fetches a single pending product.
    ///
    /// # Errors
    ///
    /// See [`AdminClient::fetch_approved_product`].
    pub async fn fetch_pending_product(&self, id: &str) -> Result<CanonicalProduct, ApiError> {
        self.fetch_product(ProductQueue::Pending, id).await
    }

    async fn fetch_product(
        &self,
        queue: ProductQueue,
        id: &str,
    ) -> Result<CanonicalProduct, ApiError> {
        let url = self.endpoint(&["api", "product", queue.endpoint(), id]);
        let body = self
            .send(Method::GET, url, None, StatusPolicy::SessionScoped)
            .await?;

        let record = match body.get("data") {
            Some(record) if record.is_object() => record.clone(),
            _ => {
                return Err(ApiError::Normalization {
                    product_id: id.to_owned(),
                    reason: "response has no product data".into(),
                })
            }
        };
        let shape = detect_record_shape(&record);
        normalize_product(RawProduct::from_value(shape, record)?)
    }

    /// Approves a pending product. Returns the server's confirmation
    /// message, if any.
    ///
    /// # Errors
    ///
    /// - [`ApiError::SessionInvalid`] on 401 or 404.
    /// - [`ApiError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    pub async fn approve_product(&self, id: &str) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "product", "approve", id]);
        let body = self
            .send(
                Method::PUT,
                url,
                Some(serde_json::json!({})),
                StatusPolicy::SessionScoped,
            )
            .await?;
        Ok(server_message(&body))
    }

    /// Rejects a pending product with a reason shown to the seller.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] if `reason` is blank; nothing is sent.
    /// - otherwise as [`AdminClient::approve_product`].
    pub async fn reject_product(&self, id: &str, reason: &str) -> Result<Option<String>, ApiError> {
        validate_rejection_reason(reason)?;
        let url = self.endpoint(&["api", "product", "reject", id]);
        let body = self
            .send(
                Method::PUT,
                url,
                Some(serde_json::json!({ "verificationRemarks": reason })),
                StatusPolicy::SessionScoped,
            )
            .await?;
        Ok(server_message(&body))
    }

    /// Fetches the category-type, category, and subcategory dropdowns
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Fails with the first error of the three requests.
    pub async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
        let (category_types, categories, subcategories) = tokio::try_join!(
            self.fetch_options("category-type"),
            self.fetch_options("category"),
            self.fetch_options("subcategory"),
        )?;
        Ok(FilterOptions {
            category_types,
            categories,
            subcategories,
        })
    }

    async fn fetch_options(&self, collection: &str) -> Result<Vec<FilterOption>, ApiError> {
        let url = self.endpoint(&["api", collection, "all"]);
        let body = self
            .send(Method::GET, url, None, StatusPolicy::Listing)
            .await?;
        let options: Vec<FilterOption> = body
            .get("data")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(FilterOption::from_value).collect())
            .unwrap_or_default();
        tracing::debug!(collection, count = options.len(), "filter options fetched");
        Ok(options)
    }

    /// Returns `true` if the backend accepts the current admin session.
    /// Any failure, including network errors, counts as no session.
    pub async fn check_admin_session(&self) -> bool {
        let url = self.endpoint(&["shopify", "authenticate-admin"]);
        match self
            .send(Method::GET, url, None, StatusPolicy::Listing)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "admin session check failed");
                false
            }
        }
    }

    /// Builds an endpoint URL below the base URL. Segments are
    /// percent-encoded, so ids containing `/` stay a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn listing_url(&self, kind: ListingKind, query: &ListingQuery) -> Url {
        let segments: Vec<&str> = kind.path().split('/').collect();
        let mut url = self.endpoint(&segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request, maps non-2xx statuses, and parses the body as JSON.
    /// An empty body parses as `null`.
    async fn send(
        &self,
        method: Method,
        url: Url,
        json: Option<Value>,
        policy: StatusPolicy,
    ) -> Result<Value, ApiError> {
        let mut request = self.authorize(self.client.request(method.clone(), url.clone()));
        if let Some(json) = &json {
            request = request.json(json);
        }

        tracing::debug!(%method, url = %url, "sending admin API request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%method, url = %url, status = status.as_u16(), "admin API request failed");
            return Err(map_status(status, &url, &body, policy));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: format!("{method} {url}"),
            source: e,
        })
    }
}

fn map_status(status: StatusCode, url: &Url, body: &str, policy: StatusPolicy) -> ApiError {
    if policy == StatusPolicy::SessionScoped
        && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND)
    {
        return ApiError::SessionInvalid {
            status: status.as_u16(),
            url: url.to_string(),
        };
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(server_message);
    ApiError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_string(),
        message,
    }
}

/// The `message` field of a response envelope, if non-blank.
fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

#[async_trait]
impl ProductSource for AdminClient {
    async fn fetch_listing(
        &self,
        kind: ListingKind,
        query: &ListingQuery,
    ) -> Result<ListingPage, ApiError> {
        AdminClient::fetch_listing(self, kind, query).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
