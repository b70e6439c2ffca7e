//! Per-field extraction over the two raw product shapes.
//!
//! [`RawProduct`] tags a record with the shape it was detected under; each
//! accessor is an exhaustive match over that tag and applies the fixed
//! fallback order for its field. Accessors return `None` for unresolvable
//! fields. Placeholders such as "Unknown" are a rendering concern and never
//! produced here.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use mktadmin_core::{ProductImage, ProductStatus};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ApiError;
use crate::shape::Shape;
use crate::types::{RawImage, RawProductA, RawProductB, RawVendor};

/// A raw product record tagged with its detected shape.
#[derive(Debug)]
pub enum RawProduct {
    A(RawProductA),
    B(RawProductB),
}

/// Fields addressable through [`RawProduct::field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Id,
    Title,
    ImageUrl,
    TotalInventory,
    Price,
    ProductType,
    Vendor,
    Status,
    CreatedAt,
}

impl FromStr for ProductField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "imageUrl" => Ok(Self::ImageUrl),
            "totalInventory" => Ok(Self::TotalInventory),
            "price" => Ok(Self::Price),
            "productType" => Ok(Self::ProductType),
            "vendor" => Ok(Self::Vendor),
            "status" => Ok(Self::Status),
            "createdAt" => Ok(Self::CreatedAt),
            other => Err(format!("unknown product field \"{other}\"")),
        }
    }
}

/// Value of a single extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

impl RawProduct {
    /// Parses `record` under `shape`.
    ///
    /// For [`Shape::B`] the record may be an edge (`{ "node": ... }`) or a
    /// bare node.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deserialize`] if the record is not a JSON object.
    pub fn from_value(shape: Shape, record: Value) -> Result<Self, ApiError> {
        let deserialize_err = |source| ApiError::Deserialize {
            context: format!("product record ({shape} shape)"),
            source,
        };
        match shape {
            Shape::A => serde_json::from_value(record)
                .map(Self::A)
                .map_err(deserialize_err),
            Shape::B => {
                let node = match record {
                    Value::Object(mut map) if map.contains_key("node") => {
                        map.remove("node").unwrap_or(Value::Null)
                    }
                    other => other,
                };
                serde_json::from_value(node)
                    .map(Self::B)
                    .map_err(deserialize_err)
            }
        }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::A(_) => Shape::A,
            Self::B(_) => Shape::B,
        }
    }

    /// Generic field access, for callers that address fields by name.
    #[must_use]
    pub fn field(&self, field: ProductField) -> Option<FieldValue> {
        match field {
            ProductField::Id => self.id().map(|s| FieldValue::Text(s.to_owned())),
            ProductField::Title => self.title().map(|s| FieldValue::Text(s.to_owned())),
            ProductField::ImageUrl => self.image_url().map(|s| FieldValue::Text(s.to_owned())),
            ProductField::TotalInventory => self.total_inventory().map(FieldValue::Integer),
            ProductField::Price => self.price().map(FieldValue::Decimal),
            ProductField::ProductType => {
                self.product_type().map(|s| FieldValue::Text(s.to_owned()))
            }
            ProductField::Vendor => self.vendor().map(|s| FieldValue::Text(s.to_owned())),
            ProductField::Status => Some(FieldValue::Text(self.status().as_str().to_owned())),
            ProductField::CreatedAt => self.created_at().map(FieldValue::Timestamp),
        }
    }

    /// `id` → `_id`; GraphQL nodes keep their composite id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::A(a) => a.id.as_deref().or(a.document_id.as_deref()),
            Self::B(b) => b.id.as_deref(),
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::A(a) => a.title.as_deref(),
            Self::B(b) => b.title.as_deref(),
        }
    }

    /// `image` → `images[0].url`; GraphQL uses the featured media preview.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::A(a) => a
                .image
                .as_deref()
                .or_else(|| a.images.first().and_then(|i| i.url.as_deref())),
            Self::B(b) => b
                .featured_media
                .as_ref()
                .and_then(|m| m.image())
                .and_then(|i| i.url.as_deref()),
        }
    }

    /// `totalInventory` → `stock`. A zero total falls through to `stock`.
    #[must_use]
    pub fn total_inventory(&self) -> Option<i64> {
        match self {
            Self::A(a) => match a.total_inventory {
                Some(n) if n != 0 => Some(n),
                _ => a.stock,
            },
            Self::B(b) => b.total_inventory,
        }
    }

    /// `price` → `discountedPrice` (a missing or zero price falls through);
    /// GraphQL uses the first variant's price.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::A(a) => match a.price {
                Some(p) if !p.is_zero() => Some(p),
                _ => a.discounted_price,
            },
            Self::B(b) => b.variant_nodes().next().and_then(|v| v.price),
        }
    }

    #[must_use]
    pub fn compare_at_price(&self) -> Option<Decimal> {
        match self {
            Self::A(a) => a.compare_at_price,
            Self::B(b) => b.variant_nodes().next().and_then(|v| v.compare_at_price),
        }
    }

    /// `productType` → `categoryType.name`.
    #[must_use]
    pub fn product_type(&self) -> Option<&str> {
        match self {
            Self::A(a) => a.product_type.as_deref().or_else(|| {
                a.category_type
                    .as_ref()
                    .and_then(|c| c.name.as_deref())
            }),
            Self::B(b) => b.product_type.as_deref(),
        }
    }

    /// Vendor name: plain string or the seller's `companyName`; GraphQL nodes
    /// use `metafield.value` → `vendor`.
    #[must_use]
    pub fn vendor(&self) -> Option<&str> {
        match self {
            Self::A(a) => match a.vendor.as_ref() {
                Some(RawVendor::Name(name)) if !name.trim().is_empty() => Some(name.as_str()),
                Some(RawVendor::Company { company_name, .. }) => company_name.as_deref(),
                _ => None,
            },
            Self::B(b) => b
                .metafield
                .as_ref()
                .and_then(|m| m.value.as_deref())
                .or(b.vendor.as_deref()),
        }
    }

    /// Seller contact email, only known for populated native vendors.
    #[must_use]
    pub fn vendor_email(&self) -> Option<&str> {
        match self {
            Self::A(a) => match a.vendor.as_ref() {
                Some(RawVendor::Company { email, .. }) => email.as_deref(),
                _ => None,
            },
            Self::B(_) => None,
        }
    }

    /// Native records: `isActive` decides; without it the `status` override
    /// is read (`"ACTIVE"` or inactive). GraphQL: `status` verbatim, missing
    /// means unknown.
    #[must_use]
    pub fn status(&self) -> ProductStatus {
        match self {
            Self::A(a) => match (a.is_active, a.status.as_deref()) {
                (Some(true), _) | (None, Some("ACTIVE")) => ProductStatus::Active,
                _ => ProductStatus::Inactive,
            },
            Self::B(b) => b
                .status
                .as_deref()
                .map_or(ProductStatus::Unknown, ProductStatus::from_upstream),
        }
    }

    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::A(a) => a.created_at,
            Self::B(b) => b.created_at,
        }
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::A(a) => a.updated_at,
            Self::B(b) => b.updated_at,
        }
    }

    /// `description`, or the HTML body on GraphQL nodes.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::A(a) => a.description.as_deref(),
            Self::B(b) => b
                .description
                .as_deref()
                .or(b.description_html.as_deref()),
        }
    }

    /// Image gallery in upstream order; entries without a URL are skipped.
    #[must_use]
    pub fn images(&self) -> Vec<ProductImage> {
        fn to_image(raw: &RawImage) -> Option<ProductImage> {
            raw.url.as_ref().map(|url| ProductImage {
                url: url.clone(),
                alt_text: raw.alt_text.clone(),
            })
        }

        match self {
            Self::A(a) => a.images.iter().filter_map(to_image).collect(),
            Self::B(b) => b.media_images().filter_map(to_image).collect(),
        }
    }
}
