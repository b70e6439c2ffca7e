//! Listing queries and page assembly for the approved and pending listings.

use std::fmt;
use std::str::FromStr;

use mktadmin_core::CanonicalProduct;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::RawProduct;
use crate::normalize::normalize_product;
use crate::parse_helpers::{i64_from_value, opt_bool_value, value_at};
use crate::shape::{detect_collection_shape, Shape};

/// Fixed page size of both listings.
pub const PAGE_SIZE: u32 = 10;

/// Which product listing a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Approved,
    Pending,
}

impl ListingKind {
    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Approved => "api/product/all-approved-products",
            Self::Pending => "api/product/all-pending-products",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
        }
    }
}

/// Server-side filter keys, in the order they are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    InStock,
    CategoryType,
    Category,
    Subcategory,
    IsActive,
    Price,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        Self::InStock,
        Self::CategoryType,
        Self::Category,
        Self::Subcategory,
        Self::IsActive,
        Self::Price,
    ];

    /// Query parameter name.
    #[must_use]
    pub fn param(self) -> &'static str {
        match self {
            Self::InStock => "inStock",
            Self::CategoryType => "categoryType",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::IsActive => "isActive",
            Self::Price => "price",
        }
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.param() == s)
            .ok_or_else(|| format!("unknown filter \"{s}\""))
    }
}

/// Filter values keyed by [`FilterField`]. Empty and `"all"` mean unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    values: [String; 6],
}

impl ListingFilters {
    fn slot(field: FilterField) -> usize {
        FilterField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default()
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        self.values[Self::slot(field)] = value.into();
    }

    #[must_use]
    pub fn get(&self, field: FilterField) -> &str {
        &self.values[Self::slot(field)]
    }

    /// Filters that restrict the listing, as `(param, value)` pairs.
    pub fn active(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FilterField::ALL
            .into_iter()
            .zip(self.values.iter())
            .filter(|(_, v)| !v.is_empty() && v.as_str() != "all")
            .map(|(f, v)| (f.param(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Price bucket selected in the listing toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    #[default]
    All,
    Between(Decimal, Decimal),
    AtLeast(Decimal),
}

impl PriceRange {
    /// The buckets offered by the dashboard.
    pub const PRESETS: [&'static str; 6] = [
        "all",
        "0-500",
        "500-1000",
        "1000-5000",
        "5000-10000",
        "10000+",
    ];

    #[must_use]
    pub fn min_price(&self) -> Option<Decimal> {
        match self {
            Self::All => None,
            Self::Between(min, _) | Self::AtLeast(min) => Some(*min),
        }
    }

    #[must_use]
    pub fn max_price(&self) -> Option<Decimal> {
        match self {
            Self::Between(_, max) => Some(*max),
            Self::All | Self::AtLeast(_) => None,
        }
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            Decimal::from_str(part.trim()).map_err(|e| format!("invalid price \"{part}\": {e}"))
        };
        if s.is_empty() || s == "all" {
            return Ok(Self::All);
        }
        if let Some(min) = s.strip_suffix('+') {
            return Ok(Self::AtLeast(parse(min)?));
        }
        match s.split_once('-') {
            Some((min, max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if min > max {
                    return Err(format!("price range \"{s}\" has min above max"));
                }
                Ok(Self::Between(min, max))
            }
            None => Err(format!(
                "invalid price range \"{s}\" (expected all, <min>-<max> or <min>+)"
            )),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Between(min, max) => write!(f, "{min}-{max}"),
            Self::AtLeast(min) => write!(f, "{min}+"),
        }
    }
}

/// Everything sent to a listing endpoint for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub filters: ListingFilters,
    pub search: String,
    pub price_range: PriceRange,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            filters: ListingFilters::default(),
            search: String::new(),
            price_range: PriceRange::All,
        }
    }
}

impl ListingQuery {
    /// Query string pairs: `page`, `limit`, active filters, `search`,
    /// `minPrice`, `maxPrice`. Empty search and unbounded prices are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", PAGE_SIZE.to_string()),
        ];
        pairs.extend(
            self.filters
                .active()
                .map(|(param, value)| (param, value.to_owned())),
        );
        if !self.search.trim().is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(min) = self.price_range.min_price() {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.price_range.max_price() {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs
    }
}

/// One assembled page of a listing.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub shape: Shape,
    pub products: Vec<CanonicalProduct>,
    pub total_count: u64,
    pub total_pages: u32,
}

impl ListingPage {
    #[must_use]
    pub fn empty(shape: Shape) -> Self {
        Self {
            shape,
            products: Vec::new(),
            total_count: 0,
            total_pages: 1,
        }
    }
}

/// Builds a [`ListingPage`] from a listing response body.
///
/// The shape is detected once for the whole body. Records that fail to
/// parse or normalize are skipped with a warning. The approved listing keeps
/// only active products and derives its totals from what survives; the
/// pending listing reads totals from the `success` envelope.
#[must_use]
pub fn assemble_page(kind: ListingKind, body: &Value) -> ListingPage {
    let shape = detect_collection_shape(body);

    if kind == ListingKind::Pending && !value_at(body, &["success"]).is_some_and(is_truthy) {
        tracing::debug!("pending listing response without success flag, treating as empty");
        return ListingPage::empty(shape);
    }

    let records: &[Value] = match shape {
        Shape::B => value_at(body, &["data", "products", "edges"]),
        Shape::A => value_at(body, &["data"]),
    }
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or_default();

    let mut products: Vec<CanonicalProduct> = records
        .iter()
        .filter_map(|record| match parse_record(shape, record) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(kind = kind.label(), %shape, error = %e, "skipping product record");
                None
            }
        })
        .collect();

    match kind {
        ListingKind::Approved => {
            retain_active(&mut products);
            let total_count = products.len() as u64;
            ListingPage {
                shape,
                total_pages: pages_for(total_count),
                total_count,
                products,
            }
        }
        ListingKind::Pending => {
            let total_pages = value_at(body, &["totalPages"])
                .and_then(i64_from_value)
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(1);
            let total_count = value_at(body, &["totalItems"])
                .and_then(i64_from_value)
                .filter(|n| *n > 0)
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(records.len() as u64);
            ListingPage {
                shape,
                products,
                total_count,
                total_pages,
            }
        }
    }
}

/// Keeps only products whose derived status is `ACTIVE`.
pub fn retain_active(products: &mut Vec<CanonicalProduct>) {
    products.retain(CanonicalProduct::is_active);
}

fn parse_record(shape: Shape, record: &Value) -> Result<CanonicalProduct, ApiError> {
    normalize_product(RawProduct::from_value(shape, record.clone())?)
}

fn pages_for(count: u64) -> u32 {
    u32::try_from(count.div_ceil(u64::from(PAGE_SIZE))).unwrap_or(u32::MAX)
}

fn is_truthy(value: &Value) -> bool {
    opt_bool_value(value).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(query: &ListingQuery) -> Vec<(String, String)> {
        query
            .query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn default_query_sends_only_paging() {
        assert_eq!(
            pairs(&ListingQuery::default()),
            vec![pair("page", "1"), pair("limit", "10")]
        );
    }

    #[test]
    fn query_orders_filters_then_search_then_prices() {
        let mut query = ListingQuery {
            page: 3,
            search: "kurta".to_string(),
            price_range: "500-1000".parse().unwrap(),
            ..ListingQuery::default()
        };
        query.filters.set(FilterField::Category, "c1");
        query.filters.set(FilterField::InStock, "true");
        query.filters.set(FilterField::IsActive, "all");

        assert_eq!(
            pairs(&query),
            vec![
                pair("page", "3"),
                pair("limit", "10"),
                pair("inStock", "true"),
                pair("category", "c1"),
                pair("search", "kurta"),
                pair("minPrice", "500"),
                pair("maxPrice", "1000"),
            ]
        );
    }

    #[test]
    fn open_ended_price_range_sends_min_only() {
        let query = ListingQuery {
            price_range: "10000+".parse().unwrap(),
            ..ListingQuery::default()
        };
        let sent = pairs(&query);
        assert!(sent.contains(&pair("minPrice", "10000")));
        assert!(!sent.iter().any(|(k, _)| k == "maxPrice"));
    }

    #[test]
    fn price_range_parses_presets() {
        for preset in PriceRange::PRESETS {
            let parsed: PriceRange = preset.parse().unwrap();
            assert_eq!(parsed.to_string(), preset);
        }
        assert_eq!("".parse::<PriceRange>().unwrap(), PriceRange::All);
    }

    #[test]
    fn price_range_rejects_garbage() {
        assert!("cheap".parse::<PriceRange>().is_err());
        assert!("900-100".parse::<PriceRange>().is_err());
        assert!("x+".parse::<PriceRange>().is_err());
    }

    #[test]
    fn filter_field_parses_param_names() {
        assert_eq!(
            "categoryType".parse::<FilterField>().unwrap(),
            FilterField::CategoryType
        );
        assert!("color".parse::<FilterField>().is_err());
    }

    #[test]
    fn approved_native_page_keeps_active_only() {
        let body = json!({"data": [
            {"_id": "1", "title": "On", "isActive": true},
            {"_id": "2", "title": "Off", "isActive": false},
            {"_id": "3", "title": "Override", "status": "ACTIVE"}
        ]});
        let page = assemble_page(ListingKind::Approved, &body);
        assert_eq!(page.shape, Shape::A);
        let ids: Vec<_> = page.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn approved_graphql_page_filters_on_node_status() {
        let body = json!({"data": {"products": {"edges": [
            {"node": {"id": "gid://shopify/Product/1", "status": "ACTIVE"}},
            {"node": {"id": "gid://shopify/Product/2", "status": "DRAFT"}},
            {"node": {"id": "gid://shopify/Product/3", "status": "ARCHIVED"}}
        ]}}});
        let page = assemble_page(ListingKind::Approved, &body);
        assert_eq!(page.shape, Shape::B);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].route_id(), "1");
    }

    #[test]
    fn approved_page_count_rounds_up() {
        let records: Vec<_> = (0..11)
            .map(|i| json!({"_id": i.to_string(), "isActive": true}))
            .collect();
        let page = assemble_page(ListingKind::Approved, &json!({ "data": records }));
        assert_eq!(page.total_count, 11);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn approved_empty_page_has_zero_pages() {
        let page = assemble_page(ListingKind::Approved, &json!({"data": []}));
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn pending_page_reads_envelope_totals() {
        let body = json!({
            "success": true,
            "totalPages": 4,
            "totalItems": 37,
            "data": [
                {"_id": "1", "isActive": false},
                {"_id": "2", "isActive": false}
            ]
        });
        let page = assemble_page(ListingKind::Pending, &body);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.total_count, 37);
    }

    #[test]
    fn pending_page_defaults_missing_totals() {
        let body = json!({"success": true, "data": [{"_id": "1"}]});
        let page = assemble_page(ListingKind::Pending, &body);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn pending_page_without_success_is_empty() {
        let body = json!({"success": false, "data": [{"_id": "1"}]});
        let page = assemble_page(ListingKind::Pending, &body);
        assert!(page.products.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn records_without_id_are_skipped() {
        let body = json!({"success": true, "data": [{"title": "no id"}, {"_id": "ok"}]});
        let page = assemble_page(ListingKind::Pending, &body);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id, "ok");
    }
}
