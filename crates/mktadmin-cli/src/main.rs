use clap::{Parser, Subcommand};
use mktadmin_api::{AdminClient, ApiError, FilterField, FilterOption};
use tracing_subscriber::EnvFilter;

mod products;
mod render;

use products::{ListArgs, ProductsCommands};

#[derive(Debug, Parser)]
#[command(name = "mktadmin")]
#[command(about = "Marketplace product review from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse and review products
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// List category types, categories, and subcategories usable as filters
    Categories,
    /// Admin session commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Debug, Subcommand)]
enum AuthCommands {
    /// Check whether the backend accepts the configured admin session
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mktadmin_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = ?config, "configuration loaded");

    let client = AdminClient::from_config(&config)?;

    let result = match cli.command {
        Commands::Products { command } => run_products(&client, command).await,
        Commands::Categories => run_categories(&client).await,
        Commands::Auth {
            command: AuthCommands::Status,
        } => run_auth_status(&client).await,
    };

    result.map_err(|e| {
        if e
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_session_invalid)
        {
            e.context("admin session is no longer valid; sign in again and update MKTADMIN_API_TOKEN")
        } else {
            e
        }
    })
}

async fn run_products(client: &AdminClient, command: ProductsCommands) -> anyhow::Result<()> {
    match command {
        ProductsCommands::List {
            queue,
            page,
            search,
            title,
            price_range,
            in_stock,
            category_type,
            category,
            subcategory,
            is_active,
            price,
            json,
        } => {
            let args = ListArgs {
                page,
                search,
                price_range,
                filters: vec![
                    (FilterField::InStock, in_stock),
                    (FilterField::CategoryType, category_type),
                    (FilterField::Category, category),
                    (FilterField::Subcategory, subcategory),
                    (FilterField::IsActive, is_active),
                    (FilterField::Price, price),
                ],
            };
            products::run_products_list(client, queue, args, title.as_deref(), json).await
        }
        ProductsCommands::Show {
            queue,
            id,
            color,
            json,
        } => products::run_products_show(client, queue, &id, color.as_deref(), json).await,
        ProductsCommands::Approve { id } => products::run_products_approve(client, &id).await,
        ProductsCommands::Reject { id, reason } => {
            products::run_products_reject(client, &id, &reason).await
        }
    }
}

/// Prints the three filter option lists.
///
/// # Errors
///
/// Returns an error if any of the lists could not be fetched.
async fn run_categories(client: &AdminClient) -> anyhow::Result<()> {
    let options = client.fetch_filter_options().await?;
    print_options("Category types (--category-type)", &options.category_types);
    print_options("Categories (--category)", &options.categories);
    print_options("Subcategories (--subcategory)", &options.subcategories);
    Ok(())
}

fn print_options(heading: &str, options: &[FilterOption]) {
    println!("{heading}");
    if options.is_empty() {
        println!("  (none)");
    }
    for option in options {
        println!("  {:<26}{}", option.id, option.name);
    }
    println!();
}

/// Reports whether the admin session is accepted.
///
/// # Errors
///
/// Returns an error when the session is rejected, so the process exits
/// non-zero.
async fn run_auth_status(client: &AdminClient) -> anyhow::Result<()> {
    if client.check_admin_session().await {
        println!("admin session is valid");
        Ok(())
    } else {
        anyhow::bail!("admin session was rejected by the backend")
    }
}
