//! Terminal rendering of listings and product details.
//!
//! Placeholders for missing values are applied here and nowhere else.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use mktadmin_api::ListingController;
use mktadmin_core::{CanonicalProduct, CanonicalVariant, ProductStatus};
use regex::Regex;
use rust_decimal::Decimal;

const TITLE_WIDTH: usize = 20;

static HTML_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tags regex"));

/// Listing title: `"Untitled"` when missing, cut to 20 characters plus `"..."`.
pub(crate) fn title_cell(title: Option<&str>) -> String {
    match title {
        Some(t) if t.chars().count() > TITLE_WIDTH => {
            format!("{}...", t.chars().take(TITLE_WIDTH).collect::<String>())
        }
        Some(t) => t.to_string(),
        None => "Untitled".to_string(),
    }
}

pub(crate) fn price_cell(price: Option<Decimal>) -> String {
    price.map_or_else(|| "N/A".to_string(), |p| format!("\u{20b9}{p}"))
}

pub(crate) fn product_type_cell(product_type: Option<&str>) -> String {
    product_type.unwrap_or("Unavailable").to_string()
}

pub(crate) fn vendor_cell(vendor: Option<&str>) -> String {
    vendor.unwrap_or("Unknown").to_string()
}

pub(crate) fn date_cell(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

pub(crate) fn stock_cell(inventory: i64) -> String {
    if inventory > 0 {
        format!("In stock ({inventory})")
    } else {
        "Out of stock".to_string()
    }
}

/// Listing status chip: active products read `ACTIVE`, everything else is
/// awaiting review.
pub(crate) fn status_chip(status: &ProductStatus) -> &'static str {
    if status.is_active() {
        "ACTIVE"
    } else {
        "Pending"
    }
}

/// Detail-view status label; the upstream spelling, or `"Unknown"`.
pub(crate) fn status_label(status: &ProductStatus) -> &str {
    match status {
        ProductStatus::Unknown => "Unknown",
        other => other.as_str(),
    }
}

/// Removes HTML tags from a description.
pub(crate) fn strip_html(raw: &str) -> String {
    HTML_TAGS.replace_all(raw, "").trim().to_string()
}

/// Renders the listing table, the item window, and the page footer.
pub(crate) fn listing_table(controller: &ListingController) -> String {
    let mut out = String::new();
    let rows = controller.visible_products();

    let _ = writeln!(
        out,
        "{:<12}{:<24}{:<18}{:<12}{:<16}{:<20}{:<9}CREATED",
        "ID", "TITLE", "STOCK", "PRICE", "TYPE", "VENDOR", "STATUS"
    );
    for product in &rows {
        let _ = writeln!(
            out,
            "{:<12}{:<24}{:<18}{:<12}{:<16}{:<20}{:<9}{}",
            product.route_id(),
            title_cell(product.title.as_deref()),
            stock_cell(product.total_inventory),
            price_cell(product.price),
            product_type_cell(product.product_type.as_deref()),
            vendor_cell(product.vendor.as_deref()),
            status_chip(&product.status),
            date_cell(product.created_at),
        );
    }
    if rows.is_empty() {
        let _ = writeln!(out, "no products found");
    }

    let shown = controller
        .page_window()
        .map_or_else(|| "0".to_string(), |(start, end)| format!("{start}-{end}"));
    let _ = writeln!(
        out,
        "Showing: {shown} | Total Products: {} | Page {} of {}",
        controller.total_count(),
        controller.page(),
        controller.total_pages()
    );
    out
}

/// Renders a product detail view with `selected` as the active variant.
pub(crate) fn product_detail(
    product: &CanonicalProduct,
    selected: Option<&CanonicalVariant>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", product.title.as_deref().unwrap_or("Untitled"));
    let _ = writeln!(out, "ID:        {}", product.id);
    let _ = writeln!(out, "Status:    {}", status_label(&product.status));
    let _ = write!(out, "Price:     {}", price_cell(product.display_price(selected)));
    if let Some(compare) = product.display_compare_at_price(selected) {
        let _ = write!(out, " (was {})", price_cell(Some(compare)));
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Type:      {}",
        product_type_cell(product.product_type.as_deref())
    );
    let _ = writeln!(out, "Vendor:    {}", vendor_cell(product.vendor.as_deref()));
    let _ = writeln!(out, "Inventory: {}", stock_cell(product.total_inventory));
    let _ = writeln!(out, "Created:   {}", date_cell(product.created_at));
    let _ = writeln!(out, "Updated:   {}", date_cell(product.updated_at));

    let image = selected.map_or_else(|| product.primary_image(), |v| product.variant_image(v));
    let _ = writeln!(out, "Image:     {}", image.unwrap_or("N/A"));

    if let Some(description) = product.description.as_deref() {
        let text = strip_html(description);
        if !text.is_empty() {
            let _ = writeln!(out, "\n{text}");
        }
    }

    if product.images.len() > 1 {
        let _ = writeln!(out, "\nGallery:");
        for image in &product.images {
            let _ = writeln!(out, "  {}", image.url);
        }
    }

    if !product.variants.is_empty() {
        let _ = writeln!(
            out,
            "\n  {:<12}{:<10}{:<12}{:<18}SKU",
            "COLOR", "SIZE", "PRICE", "STOCK"
        );
        for variant in &product.variants {
            let marker = if selected.is_some_and(|s| std::ptr::eq(s, variant)) {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(
                out,
                "{marker} {:<12}{:<10}{:<12}{:<18}{}",
                variant.color_option.as_deref().unwrap_or("-"),
                variant.size_option.as_deref().unwrap_or("-"),
                price_cell(variant.price.or(product.price)),
                stock_cell(variant.inventory_quantity.unwrap_or(0)),
                variant.sku.as_deref().unwrap_or("N/A"),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> CanonicalProduct {
        CanonicalProduct {
            id: "gid://shopify/Product/77".to_string(),
            title: Some("Block Print Cotton Dupatta".to_string()),
            image_url: Some("https://cdn.test/main.jpg".to_string()),
            images: vec![],
            total_inventory: 0,
            price: Some(Decimal::from(650)),
            compare_at_price: None,
            product_type: None,
            vendor: None,
            status: ProductStatus::Unknown,
            description: Some("<p>Soft <b>cotton</b></p>".to_string()),
            created_at: None,
            updated_at: None,
            variants: vec![CanonicalVariant {
                id: Some("v1".to_string()),
                title: Some("Indigo / Free".to_string()),
                price: Some(Decimal::from(700)),
                compare_at_price: None,
                inventory_quantity: Some(2),
                sku: None,
                barcode: None,
                display_name: None,
                color_option: Some("Indigo".to_string()),
                size_option: Some("Free".to_string()),
                image_url: None,
            }],
        }
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(
            title_cell(Some("Block Print Cotton Dupatta")),
            "Block Print Cotton D..."
        );
        assert_eq!(title_cell(Some("Short")), "Short");
        assert_eq!(title_cell(None), "Untitled");
    }

    #[test]
    fn missing_values_get_placeholders() {
        assert_eq!(price_cell(None), "N/A");
        assert_eq!(product_type_cell(None), "Unavailable");
        assert_eq!(vendor_cell(None), "Unknown");
        assert_eq!(date_cell(None), "N/A");
    }

    #[test]
    fn price_has_rupee_sign() {
        assert_eq!(price_cell(Some(Decimal::from(250))), "\u{20b9}250");
    }

    #[test]
    fn stock_reads_in_or_out() {
        assert_eq!(stock_cell(4), "In stock (4)");
        assert_eq!(stock_cell(0), "Out of stock");
        assert_eq!(stock_cell(-1), "Out of stock");
    }

    #[test]
    fn status_chip_is_active_or_pending() {
        assert_eq!(status_chip(&ProductStatus::Active), "ACTIVE");
        assert_eq!(status_chip(&ProductStatus::Inactive), "Pending");
        assert_eq!(
            status_chip(&ProductStatus::Other("DRAFT".to_string())),
            "Pending"
        );
    }

    #[test]
    fn status_label_keeps_upstream_spelling() {
        assert_eq!(status_label(&ProductStatus::Unknown), "Unknown");
        assert_eq!(
            status_label(&ProductStatus::Other("ARCHIVED".to_string())),
            "ARCHIVED"
        );
    }

    #[test]
    fn html_is_stripped() {
        assert_eq!(strip_html("<p>Soft <b>cotton</b></p>"), "Soft cotton");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn detail_uses_selected_variant_price_and_parent_image() {
        let product = product();
        let selected = product.initial_variant();
        let text = product_detail(&product, selected);
        assert!(text.contains("Price:     \u{20b9}700"), "{text}");
        assert!(text.contains("Image:     https://cdn.test/main.jpg"), "{text}");
        assert!(text.contains("Status:    Unknown"), "{text}");
        assert!(text.contains("Soft cotton"), "{text}");
        assert!(text.contains("* Indigo"), "{text}");
    }

    #[test]
    fn detail_without_selection_uses_product_price() {
        let product = product();
        let text = product_detail(&product, None);
        assert!(text.contains("Price:     \u{20b9}650"), "{text}");
    }
}
