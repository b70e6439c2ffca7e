//! Raw response types for the marketplace admin API.
//!
//! Two product shapes reach the dashboard:
//!
//! ### Native API shape ([`RawProductA`])
//! Produced by the marketplace's own product service (pending listing, pending
//! detail, and approved listing when the backend answers from its database).
//! Field names are camelCase; identifiers may be `id` or the document key
//! `_id`; `vendor` is either a plain name or a populated seller document with
//! `companyName` and `email`; prices are usually JSON numbers.
//!
//! ### External-platform shape ([`RawProductB`])
//! The approved listing may instead proxy a storefront GraphQL response, in
//! which case products arrive as `data.products.edges[].node`. Ids are
//! composite paths (`gid://shopify/Product/8123`), prices are decimal strings,
//! variants and media are nested `edges[].node` connections, and the seller
//! name lives in `metafield.value`.
//!
//! Every field is optional and parsed leniently (see `parse_helpers`); a
//! malformed field is treated as missing rather than failing the record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::parse_helpers::{
    lenient_vec, opt_bool, opt_decimal, opt_i64, opt_image_url, opt_lenient, opt_string,
    opt_timestamp,
};

/// A product record in the native API shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProductA {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,

    /// Document key, used when `id` is absent.
    #[serde(rename = "_id", default, deserialize_with = "opt_string")]
    pub document_id: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,

    /// Primary image URL.
    #[serde(default, deserialize_with = "opt_image_url")]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub images: Vec<RawImage>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub total_inventory: Option<i64>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub stock: Option<i64>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub discounted_price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub compare_at_price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_string")]
    pub product_type: Option<String>,

    /// Populated category-type document; only `name` is used.
    #[serde(default, deserialize_with = "opt_lenient")]
    pub category_type: Option<RawNamed>,

    #[serde(default, deserialize_with = "opt_lenient")]
    pub vendor: Option<RawVendor>,

    #[serde(default, deserialize_with = "opt_bool")]
    pub is_active: Option<bool>,

    /// Status override, consulted only when `isActive` is absent.
    #[serde(default, deserialize_with = "opt_string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub variants: Vec<RawVariantA>,
}

/// Seller reference on a native product: a name or a populated document.
#[derive(Debug, Clone)]
pub enum RawVendor {
    Name(String),
    Company {
        company_name: Option<String>,
        email: Option<String>,
    },
}

impl<'de> Deserialize<'de> for RawVendor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Company {
            #[serde(default, deserialize_with = "opt_string")]
            company_name: Option<String>,
            #[serde(default, deserialize_with = "opt_string")]
            email: Option<String>,
        }

        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(name) => Ok(Self::Name(name)),
            serde_json::Value::Object(_) => {
                let company: Company =
                    serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                Ok(Self::Company {
                    company_name: company.company_name,
                    email: company.email,
                })
            }
            other => Err(serde::de::Error::custom(format!(
                "expected vendor name or object, got {other}"
            ))),
        }
    }
}

/// A variant record in the native API shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariantA {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,

    #[serde(rename = "_id", default, deserialize_with = "opt_string")]
    pub document_id: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub discounted_price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub stock: Option<i64>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub inventory_quantity: Option<i64>,

    #[serde(default, deserialize_with = "opt_string")]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub barcode: Option<String>,

    #[serde(default, deserialize_with = "opt_image_url")]
    pub image: Option<String>,

    /// Option pairs such as `{ "option": "color", "value": "Red" }`.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub variant_types: Vec<RawVariantType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVariantType {
    #[serde(default, deserialize_with = "opt_string")]
    pub option: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub value: Option<String>,
}

/// A document reduced to its display name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default, deserialize_with = "opt_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub alt_text: Option<String>,
}

/// A product node in the external-platform GraphQL shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProductB {
    /// Composite identifier, e.g. `gid://shopify/Product/8123`.
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,

    /// Upstream status string (`"ACTIVE"`, `"DRAFT"`, `"ARCHIVED"`, ...).
    #[serde(default, deserialize_with = "opt_string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub total_inventory: Option<i64>,

    #[serde(default, deserialize_with = "opt_string")]
    pub product_type: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub vendor: Option<String>,

    /// Seller metafield; `value` holds the marketplace vendor name.
    #[serde(default, deserialize_with = "opt_lenient")]
    pub metafield: Option<RawMetafield>,

    #[serde(default, deserialize_with = "opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "opt_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub description_html: Option<String>,

    #[serde(default, deserialize_with = "opt_lenient")]
    pub featured_media: Option<RawMedia>,

    #[serde(default, deserialize_with = "opt_lenient")]
    pub media: Option<Connection<RawMedia>>,

    #[serde(default, deserialize_with = "opt_lenient")]
    pub variants: Option<Connection<RawVariantB>>,
}

impl RawProductB {
    /// Variant nodes in upstream order.
    pub fn variant_nodes(&self) -> impl Iterator<Item = &RawVariantB> {
        self.variants.iter().flat_map(|c| c.edges.iter().map(|e| &e.node))
    }

    /// Media images in upstream order.
    pub fn media_images(&self) -> impl Iterator<Item = &RawImage> {
        self.media
            .iter()
            .flat_map(|c| c.edges.iter())
            .filter_map(|e| e.node.image())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMetafield {
    #[serde(default, deserialize_with = "opt_string")]
    pub value: Option<String>,
}

/// GraphQL connection wrapper (`{ "edges": [{ "node": ... }] }`).
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Connection<T> {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    #[serde(default, deserialize_with = "opt_lenient")]
    pub preview: Option<RawPreview>,
}

impl RawMedia {
    #[must_use]
    pub fn image(&self) -> Option<&RawImage> {
        self.preview.as_ref().and_then(|p| p.image.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPreview {
    #[serde(default, deserialize_with = "opt_lenient")]
    pub image: Option<RawImage>,
}

/// A variant node in the external-platform shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariantB {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,

    /// Option title, conventionally `"<color> / <size>"`.
    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_decimal")]
    pub compare_at_price: Option<Decimal>,

    #[serde(default, deserialize_with = "opt_i64")]
    pub inventory_quantity: Option<i64>,

    #[serde(default, deserialize_with = "opt_string")]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub barcode: Option<String>,

    #[serde(default, deserialize_with = "opt_string")]
    pub display_name: Option<String>,

    #[serde(default, deserialize_with = "opt_image_url")]
    pub image: Option<String>,
}

/// One entry of a filter dropdown (category type, category, subcategory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

impl FilterOption {
    /// Builds an option from a raw document, accepting `_id` or `id`.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let id = value
            .get("_id")
            .or_else(|| value.get("id"))
            .and_then(crate::parse_helpers::string_from_value)?;
        let name = value
            .get("name")
            .and_then(crate::parse_helpers::string_from_value)?;
        Some(Self { id, name })
    }
}

/// Options for the three filter dropdowns of a listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub category_types: Vec<FilterOption>,
    pub categories: Vec<FilterOption>,
    pub subcategories: Vec<FilterOption>,
}
