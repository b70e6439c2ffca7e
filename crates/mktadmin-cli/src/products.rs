//! Product review command handlers.

use clap::{Subcommand, ValueEnum};
use mktadmin_api::{
    AdminClient, FilterField, ListingController, ListingKind, ListingQuery, PriceRange,
    ProductReviewer, ReviewOutcome,
};

use crate::render;

/// Which listing a command reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Queue {
    Approved,
    Pending,
}

impl From<Queue> for ListingKind {
    fn from(queue: Queue) -> Self {
        match queue {
            Queue::Approved => ListingKind::Approved,
            Queue::Pending => ListingKind::Pending,
        }
    }
}

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// List one page of approved or pending products
    List {
        #[arg(value_enum)]
        queue: Queue,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Server-side search term
        #[arg(long)]
        search: Option<String>,
        /// Case-insensitive title filter applied to the fetched page
        #[arg(long)]
        title: Option<String>,
        /// Price bucket: all, 0-500, 500-1000, 1000-5000, 5000-10000, 10000+
        #[arg(long, default_value = "all")]
        price_range: PriceRange,
        #[arg(long)]
        in_stock: Option<String>,
        #[arg(long)]
        category_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        is_active: Option<String>,
        /// Raw `price` filter passed through to the backend
        #[arg(long)]
        price: Option<String>,
        /// Print products as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one product in detail
    Show {
        #[arg(value_enum)]
        queue: Queue,
        /// Product id; composite ids are reduced to their last segment
        id: String,
        /// Select the variant with this color option
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Approve a pending product
    Approve { id: String },
    /// Reject a pending product
    Reject {
        id: String,
        /// Reason shown to the seller (required)
        #[arg(long, default_value = "")]
        reason: String,
    },
}

/// Listing flags gathered into a [`ListingQuery`].
#[derive(Debug, Default)]
pub(crate) struct ListArgs {
    pub page: u32,
    pub search: Option<String>,
    pub price_range: PriceRange,
    pub filters: Vec<(FilterField, Option<String>)>,
}

impl ListArgs {
    pub(crate) fn into_query(self) -> ListingQuery {
        let mut query = ListingQuery {
            page: self.page,
            search: self.search.unwrap_or_default(),
            price_range: self.price_range,
            ..ListingQuery::default()
        };
        for (field, value) in self.filters {
            if let Some(value) = value {
                query.filters.set(field, value);
            }
        }
        query
    }
}

/// Prints one page of a listing.
///
/// # Errors
///
/// Returns an error if the page could not be fetched.
pub(crate) async fn run_products_list(
    client: &AdminClient,
    queue: Queue,
    args: ListArgs,
    title: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut controller = ListingController::with_query(queue.into(), args.into_query());
    controller.fetch(client).await;
    if let Some(message) = controller.error() {
        anyhow::bail!("{message}");
    }

    controller.set_draft_search(title.unwrap_or_default());
    if json {
        println!("{}", serde_json::to_string_pretty(&controller.visible_products())?);
    } else {
        print!("{}", render::listing_table(&controller));
    }
    Ok(())
}

/// Prints a product detail view.
///
/// # Errors
///
/// Returns an error if the product could not be fetched, or if `color`
/// matches no variant.
pub(crate) async fn run_products_show(
    client: &AdminClient,
    queue: Queue,
    id: &str,
    color: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let id = route_id(id);
    let product = match queue {
        Queue::Approved => client.fetch_approved_product(id).await?,
        Queue::Pending => client.fetch_pending_product(id).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    let selected = match color {
        Some(color) => Some(
            product
                .variant_by_color(color)
                .ok_or_else(|| anyhow::anyhow!("no variant with color '{color}'"))?,
        ),
        None => product.initial_variant(),
    };
    print!("{}", render::product_detail(&product, selected));
    Ok(())
}

/// Approves a pending product and prints the refreshed record.
///
/// # Errors
///
/// Returns an error if the approval request fails.
pub(crate) async fn run_products_approve(client: &AdminClient, id: &str) -> anyhow::Result<()> {
    let outcome = ProductReviewer::new(client).approve(route_id(id)).await?;
    print_outcome(&outcome, "Product approved");
    Ok(())
}

/// Rejects a pending product and prints the refreshed record.
///
/// # Errors
///
/// Returns an error if `reason` is blank or the rejection request fails.
pub(crate) async fn run_products_reject(
    client: &AdminClient,
    id: &str,
    reason: &str,
) -> anyhow::Result<()> {
    let outcome = ProductReviewer::new(client)
        .reject(route_id(id), reason)
        .await?;
    print_outcome(&outcome, "Product rejected");
    Ok(())
}

fn print_outcome(outcome: &ReviewOutcome, fallback: &str) {
    println!("{}", outcome.message.as_deref().unwrap_or(fallback));
    match &outcome.product {
        Some(product) => print!(
            "\n{}",
            render::product_detail(product, product.initial_variant())
        ),
        None => eprintln!("warning: could not reload the product after the update"),
    }
}

fn route_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
