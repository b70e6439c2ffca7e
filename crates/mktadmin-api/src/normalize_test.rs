use std::str::FromStr;

use mktadmin_core::ProductStatus;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::*;
use crate::shape::Shape;

fn native(record: Value) -> CanonicalProduct {
    let raw = RawProduct::from_value(Shape::A, record).unwrap();
    normalize_product(raw).unwrap()
}

fn graphql(node: Value) -> CanonicalProduct {
    let raw = RawProduct::from_value(Shape::B, json!({ "node": node })).unwrap();
    normalize_product(raw).unwrap()
}

// -----------------------------------------------------------------------
// split_variant_title
// -----------------------------------------------------------------------

#[test]
fn split_title_two_segments() {
    assert_eq!(
        split_variant_title("Red / Large"),
        Some((Some("Red".to_owned()), Some("Large".to_owned())))
    );
}

#[test]
fn split_title_trims_without_spaces() {
    assert_eq!(
        split_variant_title("Navy/XL"),
        Some((Some("Navy".to_owned()), Some("XL".to_owned())))
    );
}

#[test]
fn split_title_single_segment_is_none() {
    assert_eq!(split_variant_title("OneSize"), None);
}

#[test]
fn split_title_three_segments_is_none() {
    assert_eq!(split_variant_title("Red / Large / Slim"), None);
}

#[test]
fn split_title_empty_segment_is_absent() {
    assert_eq!(
        split_variant_title("Red / "),
        Some((Some("Red".to_owned()), None))
    );
}

// -----------------------------------------------------------------------
// normalize_product: native shape
// -----------------------------------------------------------------------

#[test]
fn native_active_flag_drives_status() {
    assert_eq!(
        native(json!({"_id": "p1", "isActive": true})).status,
        ProductStatus::Active
    );
    assert_eq!(
        native(json!({"_id": "p1", "isActive": false})).status,
        ProductStatus::Inactive
    );
}

#[test]
fn native_price_falls_back_to_discounted_price() {
    let product = native(json!({"_id": "p1", "price": null, "discountedPrice": 250}));
    assert_eq!(product.price, Some(Decimal::from(250)));
}

#[test]
fn native_missing_inventory_defaults_to_zero() {
    let product = native(json!({"_id": "p1"}));
    assert_eq!(product.total_inventory, 0);
}

#[test]
fn native_product_maps_core_fields() {
    let product = native(json!({
        "_id": "65f0c1",
        "title": "Cotton Kurta",
        "image": "https://cdn.test/kurta.jpg",
        "images": [{"url": "https://cdn.test/kurta.jpg"}, {"url": "https://cdn.test/back.jpg"}],
        "stock": 12,
        "price": 1299,
        "categoryType": {"name": "Ethnic Wear"},
        "vendor": {"companyName": "Weavers Co", "email": "hello@weavers.test"},
        "description": "<p>Handloom</p>",
        "createdAt": "2024-05-02T08:00:00.000Z"
    }));
    assert_eq!(product.id, "65f0c1");
    assert_eq!(product.route_id(), "65f0c1");
    assert_eq!(product.title.as_deref(), Some("Cotton Kurta"));
    assert_eq!(product.images.len(), 2);
    assert_eq!(product.total_inventory, 12);
    assert_eq!(product.price, Some(Decimal::from(1299)));
    assert_eq!(product.product_type.as_deref(), Some("Ethnic Wear"));
    assert_eq!(product.vendor.as_deref(), Some("Weavers Co"));
    assert_eq!(product.description.as_deref(), Some("<p>Handloom</p>"));
    assert!(product.created_at.is_some());
    assert_eq!(product.status, ProductStatus::Inactive);
}

#[test]
fn native_variant_types_set_options() {
    let product = native(json!({
        "_id": "p1",
        "variants": [{
            "_id": "v1",
            "title": "Festive",
            "price": 0,
            "discountedPrice": 899,
            "stock": 3,
            "variantTypes": [
                {"option": "color", "value": "Maroon"},
                {"option": "Size", "value": "M"}
            ]
        }]
    }));
    let variant = &product.variants[0];
    assert_eq!(variant.id.as_deref(), Some("v1"));
    assert_eq!(variant.color_option.as_deref(), Some("Maroon"));
    assert_eq!(variant.size_option.as_deref(), Some("M"));
    assert_eq!(variant.price, Some(Decimal::from(899)));
    assert_eq!(variant.inventory_quantity, Some(3));
}

#[test]
fn native_variant_without_types_uses_title() {
    let product = native(json!({
        "_id": "p1",
        "variants": [{"title": "Red / Large"}]
    }));
    let variant = &product.variants[0];
    assert_eq!(variant.color_option.as_deref(), Some("Red"));
    assert_eq!(variant.size_option.as_deref(), Some("Large"));
}

#[test]
fn product_without_id_is_rejected() {
    let raw = RawProduct::from_value(Shape::A, json!({"title": "Orphan"})).unwrap();
    let err = normalize_product(raw).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Normalization { ref product_id, .. } if product_id == "Orphan"
    ));
}

// -----------------------------------------------------------------------
// normalize_product: GraphQL shape
// -----------------------------------------------------------------------

fn graphql_node() -> Value {
    json!({
        "id": "gid://shopify/Product/8123",
        "title": "Linen Shirt",
        "status": "DRAFT",
        "totalInventory": 9,
        "productType": "Apparel",
        "vendor": "Storefront",
        "metafield": {"value": "Acme Linen"},
        "descriptionHtml": "<p>Breathable</p>",
        "featuredMedia": {"preview": {"image": {"url": "https://cdn.test/shirt.jpg"}}},
        "media": {"edges": [
            {"node": {"preview": {"image": {"url": "https://cdn.test/shirt.jpg", "altText": "front"}}}}
        ]},
        "variants": {"edges": [
            {"node": {
                "id": "gid://shopify/ProductVariant/1",
                "title": "Red / Large",
                "price": "1499.00",
                "compareAtPrice": "1999.00",
                "inventoryQuantity": 4,
                "sku": "LS-R-L",
                "displayName": "Linen Shirt - Red / Large",
                "image": {"url": "https://cdn.test/red.jpg"}
            }},
            {"node": {
                "id": "gid://shopify/ProductVariant/2",
                "title": "OneSize",
                "price": "1299.00",
                "inventoryQuantity": 0
            }}
        ]}
    })
}

#[test]
fn graphql_status_kept_verbatim() {
    let product = graphql(graphql_node());
    assert_eq!(product.status.as_str(), "DRAFT");
    assert!(!product.is_active());
}

#[test]
fn graphql_product_maps_core_fields() {
    let product = graphql(graphql_node());
    assert_eq!(product.id, "gid://shopify/Product/8123");
    assert_eq!(product.route_id(), "8123");
    assert_eq!(product.vendor.as_deref(), Some("Acme Linen"));
    assert_eq!(product.total_inventory, 9);
    assert_eq!(product.price, Decimal::from_str("1499.00").ok());
    assert_eq!(product.compare_at_price, Decimal::from_str("1999.00").ok());
    assert_eq!(product.image_url.as_deref(), Some("https://cdn.test/shirt.jpg"));
    assert_eq!(product.images[0].alt_text.as_deref(), Some("front"));
    assert_eq!(product.description.as_deref(), Some("<p>Breathable</p>"));
}

#[test]
fn graphql_variants_split_titles() {
    let product = graphql(graphql_node());
    assert_eq!(product.variants.len(), 2);

    let first = &product.variants[0];
    assert_eq!(first.color_option.as_deref(), Some("Red"));
    assert_eq!(first.size_option.as_deref(), Some("Large"));
    assert_eq!(first.image_url.as_deref(), Some("https://cdn.test/red.jpg"));
    assert!(first.in_stock());

    let second = &product.variants[1];
    assert_eq!(second.color_option, None);
    assert_eq!(second.size_option, None);
    assert_eq!(second.image_url, None);
    assert_eq!(
        product.variant_image(second),
        Some("https://cdn.test/shirt.jpg")
    );
    assert!(!second.in_stock());
}

#[test]
fn graphql_initial_variant_is_first_with_color() {
    let mut node = graphql_node();
    node["variants"]["edges"]
        .as_array_mut()
        .unwrap()
        .reverse();
    let product = graphql(node);
    assert_eq!(
        product.initial_variant().and_then(|v| v.id.as_deref()),
        Some("gid://shopify/ProductVariant/1")
    );
}

#[test]
fn graphql_missing_status_is_unknown() {
    let product = graphql(json!({"id": "gid://shopify/Product/1"}));
    assert_eq!(product.status, ProductStatus::Unknown);
    assert!(product.variants.is_empty());
    assert_eq!(product.total_inventory, 0);
}
