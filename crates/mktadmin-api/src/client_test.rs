use super::*;
use crate::listing::{FilterField, PriceRange};

fn test_client(base_url: &str) -> AdminClient {
    AdminClient::new(base_url, 30, "mktadmin-test", Arc::new(NoCredentials))
        .expect("client construction should not fail")
}

// -----------------------------------------------------------------------
// base URL handling
// -----------------------------------------------------------------------

#[test]
fn endpoint_joins_under_root() {
    let client = test_client("https://api.example.com");
    let url = client.endpoint(&["api", "product", "approve", "65f0"]);
    assert_eq!(url.as_str(), "https://api.example.com/api/product/approve/65f0");
}

#[test]
fn endpoint_strips_trailing_slash() {
    let client = test_client("https://api.example.com///");
    let url = client.endpoint(&["api", "category", "all"]);
    assert_eq!(url.as_str(), "https://api.example.com/api/category/all");
}

#[test]
fn endpoint_keeps_path_prefix() {
    let client = test_client("https://example.com/backend");
    let url = client.endpoint(&["shopify", "authenticate-admin"]);
    assert_eq!(
        url.as_str(),
        "https://example.com/backend/shopify/authenticate-admin"
    );
}

#[test]
fn endpoint_encodes_id_segment() {
    let client = test_client("https://api.example.com");
    let url = client.endpoint(&["api", "product", "get-one-pending-product", "a/b c"]);
    assert_eq!(
        url.as_str(),
        "https://api.example.com/api/product/get-one-pending-product/a%2Fb%20c"
    );
}

#[test]
fn new_rejects_non_http_scheme() {
    let err = AdminClient::new("ftp://api.example.com", 30, "ua", Arc::new(NoCredentials))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }), "got {err:?}");
}

#[test]
fn new_rejects_garbage() {
    let err = AdminClient::new("not a url", 30, "ua", Arc::new(NoCredentials)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }), "got {err:?}");
}

// -----------------------------------------------------------------------
// listing_url
// -----------------------------------------------------------------------

#[test]
fn listing_url_carries_paging_only_by_default() {
    let client = test_client("https://api.example.com");
    let url = client.listing_url(ListingKind::Pending, &ListingQuery::default());
    assert_eq!(
        url.as_str(),
        "https://api.example.com/api/product/all-pending-products?page=1&limit=10"
    );
}

#[test]
fn listing_url_encodes_search_and_filters() {
    let client = test_client("https://api.example.com");
    let mut query = ListingQuery {
        page: 2,
        search: "silk & linen".to_owned(),
        price_range: PriceRange::AtLeast(10_000.into()),
        ..ListingQuery::default()
    };
    query.filters.set(FilterField::CategoryType, "ct1");

    let url = client.listing_url(ListingKind::Approved, &query);
    assert_eq!(url.path(), "/api/product/all-approved-products");
    assert_eq!(
        url.query(),
        Some("page=2&limit=10&categoryType=ct1&search=silk+%26+linen&minPrice=10000")
    );
}

// -----------------------------------------------------------------------
// status mapping
// -----------------------------------------------------------------------

fn url() -> Url {
    Url::parse("https://api.example.com/api/product/approve/1").unwrap()
}

#[test]
fn session_scoped_401_and_404_are_session_invalid() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::NOT_FOUND] {
        let err = map_status(status, &url(), "", StatusPolicy::SessionScoped);
        assert!(err.is_session_invalid(), "{status} should end the session");
    }
}

#[test]
fn listing_401_is_unexpected_status() {
    let err = map_status(
        StatusCode::UNAUTHORIZED,
        &url(),
        r#"{"message":"Unauthorized"}"#,
        StatusPolicy::Listing,
    );
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus { status: 401, message: Some(ref m), .. } if m == "Unauthorized"
    ));
}

#[test]
fn server_error_without_json_has_no_message() {
    let err = map_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        &url(),
        "<html>oops</html>",
        StatusPolicy::SessionScoped,
    );
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus { status: 500, message: None, .. }
    ));
}

#[test]
fn server_message_ignores_blank() {
    assert_eq!(
        server_message(&serde_json::json!({"message": "Product approved"})).as_deref(),
        Some("Product approved")
    );
    assert_eq!(server_message(&serde_json::json!({"message": "  "})), None);
    assert_eq!(server_message(&Value::Null), None);
}
