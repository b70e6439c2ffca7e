//! Paging, filter, and search state shared by both product listings.
//!
//! Every state change that needs data returns a [`FetchTicket`]. The caller
//! runs the ticket's query against a [`ProductSource`] and hands the result
//! back through [`ListingController::complete`]. Tickets carry a sequence
//! number; only the most recently issued ticket may update the state, so a
//! slow response can never overwrite a newer one.

use async_trait::async_trait;
use mktadmin_core::CanonicalProduct;

use crate::error::ApiError;
use crate::listing::{
    FilterField, ListingFilters, ListingKind, ListingPage, ListingQuery, PriceRange, PAGE_SIZE,
};
use crate::shape::Shape;

/// Page-level error shown when the server gave no message.
pub const FETCH_ERROR_FALLBACK: &str = "Error fetching products";

/// Anything that can serve a page of a product listing.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_listing(
        &self,
        kind: ListingKind,
        query: &ListingQuery,
    ) -> Result<ListingPage, ApiError>;
}

/// A pending fetch issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    kind: ListingKind,
    query: ListingQuery,
}

impl FetchTicket {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    #[must_use]
    pub fn query(&self) -> &ListingQuery {
        &self.query
    }
}

/// State of one product listing.
#[derive(Debug)]
pub struct ListingController {
    kind: ListingKind,
    query: ListingQuery,
    draft_search: String,
    products: Vec<CanonicalProduct>,
    shape: Option<Shape>,
    total_count: u64,
    total_pages: u32,
    loading: bool,
    error: Option<String>,
    last_issued: u64,
}

impl ListingController {
    #[must_use]
    pub fn new(kind: ListingKind) -> Self {
        Self {
            kind,
            query: ListingQuery::default(),
            draft_search: String::new(),
            products: Vec::new(),
            shape: None,
            total_count: 0,
            total_pages: 1,
            loading: false,
            error: None,
            last_issued: 0,
        }
    }

    /// Starts from an explicit query, e.g. one assembled from CLI flags.
    #[must_use]
    pub fn with_query(kind: ListingKind, query: ListingQuery) -> Self {
        let draft_search = query.search.clone();
        Self {
            query: ListingQuery {
                page: query.page.max(1),
                ..query
            },
            draft_search,
            ..Self::new(kind)
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.last_issued += 1;
        self.loading = true;
        self.error = None;
        tracing::debug!(
            kind = self.kind.label(),
            seq = self.last_issued,
            page = self.query.page,
            "issuing listing fetch"
        );
        FetchTicket {
            seq: self.last_issued,
            kind: self.kind,
            query: self.query.clone(),
        }
    }

    /// Moves to `page` (1-based; `0` is treated as `1`).
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.query.page = page.max(1);
        self.issue()
    }

    /// Sets a server-side filter and returns to page 1.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) -> FetchTicket {
        self.query.filters.set(field, value);
        self.query.page = 1;
        self.issue()
    }

    /// Sets the price bucket and returns to page 1.
    pub fn set_price_range(&mut self, range: PriceRange) -> FetchTicket {
        self.query.price_range = range;
        self.query.page = 1;
        self.issue()
    }

    /// Updates the in-memory title filter. Never fetches.
    pub fn set_draft_search(&mut self, draft: impl Into<String>) {
        self.draft_search = draft.into();
    }

    /// Commits the draft search to the server query and returns to page 1.
    pub fn submit_search(&mut self) -> FetchTicket {
        self.query.search.clone_from(&self.draft_search);
        self.query.page = 1;
        self.issue()
    }

    /// Resets filters, price range, both searches, and the page.
    pub fn clear(&mut self) -> FetchTicket {
        self.query = ListingQuery::default();
        self.draft_search.clear();
        self.issue()
    }

    /// Re-issues the current query unchanged.
    pub fn reload(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Applies the result of `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when a newer ticket
    /// has been issued since.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<ListingPage, ApiError>) -> bool {
        if ticket.seq != self.last_issued || ticket.kind != self.kind {
            tracing::debug!(
                kind = self.kind.label(),
                seq = ticket.seq,
                latest = self.last_issued,
                "discarding stale listing response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(
                    kind = self.kind.label(),
                    seq = ticket.seq,
                    shape = %page.shape,
                    count = page.products.len(),
                    total = page.total_count,
                    "listing page applied"
                );
                self.products = page.products;
                self.shape = Some(page.shape);
                self.total_count = page.total_count;
                self.total_pages = page.total_pages;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(kind = self.kind.label(), seq = ticket.seq, error = %e, "listing fetch failed");
                self.error = Some(e.display_message(FETCH_ERROR_FALLBACK));
            }
        }
        true
    }

    /// Fetches the current query from `source` and applies the result.
    ///
    /// Failures are stored as the page error (see [`Self::error`]).
    pub async fn fetch<S>(&mut self, source: &S) -> bool
    where
        S: ProductSource + ?Sized,
    {
        let ticket = self.reload();
        let result = source.fetch_listing(ticket.kind, &ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Products matching the draft search as a case-insensitive title
    /// substring. An empty draft shows everything.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&CanonicalProduct> {
        let needle = self.draft_search.to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// 1-based inclusive item range shown on the current page, or `None`
    /// when the listing is empty.
    #[must_use]
    pub fn page_window(&self) -> Option<(u64, u64)> {
        if self.total_count == 0 {
            return None;
        }
        let size = u64::from(PAGE_SIZE);
        let start = u64::from(self.query.page.saturating_sub(1)) * size + 1;
        let end = (u64::from(self.query.page) * size).min(self.total_count);
        Some((start, end))
    }

    #[must_use]
    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.query.page
    }

    #[must_use]
    pub fn filters(&self) -> &ListingFilters {
        &self.query.filters
    }

    #[must_use]
    pub fn price_range(&self) -> PriceRange {
        self.query.price_range
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.query.search
    }

    #[must_use]
    pub fn draft_search(&self) -> &str {
        &self.draft_search
    }

    #[must_use]
    pub fn products(&self) -> &[CanonicalProduct] {
        &self.products
    }

    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
