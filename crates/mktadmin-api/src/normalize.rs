//! Normalization from [`RawProduct`] to [`mktadmin_core::CanonicalProduct`].
//!
//! Field resolution is delegated to [`crate::extract`]; this module converts
//! variants and assembles the canonical record.

use mktadmin_core::{CanonicalProduct, CanonicalVariant};

use crate::error::ApiError;
use crate::extract::RawProduct;
use crate::types::{RawVariantA, RawVariantB};

/// Normalizes a raw product of either shape into a [`CanonicalProduct`].
///
/// # Errors
///
/// Returns [`ApiError::Normalization`] if the record carries no identifier.
pub fn normalize_product(raw: RawProduct) -> Result<CanonicalProduct, ApiError> {
    let Some(id) = raw.id().map(str::to_owned) else {
        return Err(ApiError::Normalization {
            product_id: raw.title().unwrap_or("<untitled>").to_owned(),
            reason: "product has no id".into(),
        });
    };

    let variants = match &raw {
        RawProduct::A(a) => a.variants.iter().map(normalize_native_variant).collect(),
        RawProduct::B(b) => b.variant_nodes().map(normalize_graphql_variant).collect(),
    };

    Ok(CanonicalProduct {
        id,
        title: raw.title().map(str::to_owned),
        image_url: raw.image_url().map(str::to_owned),
        images: raw.images(),
        total_inventory: raw.total_inventory().unwrap_or(0),
        price: raw.price(),
        compare_at_price: raw.compare_at_price(),
        product_type: raw.product_type().map(str::to_owned),
        vendor: raw.vendor().map(str::to_owned),
        status: raw.status(),
        description: raw.description().map(str::to_owned),
        created_at: raw.created_at(),
        updated_at: raw.updated_at(),
        variants,
    })
}

/// Splits a `"<color> / <size>"` variant title.
///
/// Only titles with exactly two `/`-separated segments are split; anything
/// else (`"OneSize"`, `"Red / Large / Slim"`) yields `None`. A segment that is
/// empty after trimming is reported as absent.
#[must_use]
pub fn split_variant_title(title: &str) -> Option<(Option<String>, Option<String>)> {
    let segments: Vec<&str> = title.split('/').map(str::trim).collect();
    let [color, size] = segments[..] else {
        return None;
    };
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
    Some((non_empty(color), non_empty(size)))
}

fn options_from_title(title: Option<&str>) -> (Option<String>, Option<String>) {
    title.and_then(split_variant_title).unwrap_or((None, None))
}

fn normalize_graphql_variant(variant: &RawVariantB) -> CanonicalVariant {
    let (color_option, size_option) = options_from_title(variant.title.as_deref());
    CanonicalVariant {
        id: variant.id.clone(),
        title: variant.title.clone(),
        price: variant.price,
        compare_at_price: variant.compare_at_price,
        inventory_quantity: variant.inventory_quantity,
        sku: variant.sku.clone(),
        barcode: variant.barcode.clone(),
        display_name: variant.display_name.clone(),
        color_option,
        size_option,
        image_url: variant.image.clone(),
    }
}

fn normalize_native_variant(variant: &RawVariantA) -> CanonicalVariant {
    let typed_option = |name: &str| {
        variant
            .variant_types
            .iter()
            .find(|t| {
                t.option
                    .as_deref()
                    .is_some_and(|o| o.trim().eq_ignore_ascii_case(name))
            })
            .and_then(|t| t.value.clone())
    };
    let (title_color, title_size) = options_from_title(variant.title.as_deref());

    CanonicalVariant {
        id: variant.id.clone().or_else(|| variant.document_id.clone()),
        title: variant.title.clone(),
        price: match variant.price {
            Some(p) if !p.is_zero() => Some(p),
            _ => variant.discounted_price,
        },
        compare_at_price: None,
        inventory_quantity: variant.inventory_quantity.or(variant.stock),
        sku: variant.sku.clone(),
        barcode: variant.barcode.clone(),
        display_name: None,
        color_option: typed_option("color").or(title_color),
        size_option: typed_option("size").or(title_size),
        image_url: variant.image.clone(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
