use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Review status of a marketplace product as shown to the admin.
///
/// The native API only knows active/inactive; the external platform reports
/// its own status strings (`"DRAFT"`, `"ARCHIVED"`, ...), which are kept
/// verbatim in [`ProductStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    Active,
    Inactive,
    Unknown,
    Other(String),
}

impl ProductStatus {
    /// Maps an upstream status string, preserving unrecognised values.
    #[must_use]
    pub fn from_upstream(raw: &str) -> Self {
        match raw {
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "UNKNOWN" | "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Unknown => "UNKNOWN",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProductStatus {
    fn from(raw: String) -> Self {
        Self::from_upstream(&raw)
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Shape-independent product record consumed by every listing and detail
/// view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Upstream identifier. External-platform ids are composite paths such
    /// as `gid://shopify/Product/123`; see [`CanonicalProduct::route_id`].
    pub id: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    /// Full gallery, in upstream order.
    pub images: Vec<ProductImage>,
    pub total_inventory: i64,
    pub price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub status: ProductStatus,
    /// Raw description; may contain HTML.
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub variants: Vec<CanonicalVariant>,
}

impl CanonicalProduct {
    /// Identifier used for detail lookups: everything after the last `/`.
    #[must_use]
    pub fn route_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// The image shown for the product as a whole.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.images.first().map(|i| i.url.as_str()))
    }

    /// Variant image, falling back to the parent's primary image.
    #[must_use]
    pub fn variant_image<'a>(&'a self, variant: &'a CanonicalVariant) -> Option<&'a str> {
        variant.image_url.as_deref().or_else(|| self.primary_image())
    }

    /// Price for display with an optional selected variant.
    #[must_use]
    pub fn display_price(&self, selected: Option<&CanonicalVariant>) -> Option<Decimal> {
        selected.and_then(|v| v.price).or(self.price)
    }

    #[must_use]
    pub fn display_compare_at_price(&self, selected: Option<&CanonicalVariant>) -> Option<Decimal> {
        selected.and_then(|v| v.compare_at_price).or(self.compare_at_price)
    }

    /// Initial variant selection for a detail view: the first variant with a
    /// color option, otherwise the first variant.
    #[must_use]
    pub fn initial_variant(&self) -> Option<&CanonicalVariant> {
        self.variants
            .iter()
            .find(|v| v.color_option.is_some())
            .or_else(|| self.variants.first())
    }

    /// Finds the variant whose color option equals `color`.
    #[must_use]
    pub fn variant_by_color(&self, color: &str) -> Option<&CanonicalVariant> {
        self.variants
            .iter()
            .find(|v| v.color_option.as_deref() == Some(color))
    }

    /// Sum of variant inventory, for upstreams that only report per-variant stock.
    #[must_use]
    pub fn variant_inventory(&self) -> i64 {
        self.variants
            .iter()
            .filter_map(|v| v.inventory_quantity)
            .sum()
    }
}

/// A purchasable variant of a [`CanonicalProduct`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalVariant {
    pub id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub inventory_quantity: Option<i64>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub display_name: Option<String>,
    pub color_option: Option<String>,
    pub size_option: Option<String>,
    pub image_url: Option<String>,
}

impl CanonicalVariant {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.inventory_quantity.is_some_and(|q| q > 0)
    }
}
