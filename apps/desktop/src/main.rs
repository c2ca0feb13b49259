use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings,
    view::{status_lines, PaginationView, ProductCard},
    DashboardClient, DashboardLocation, DashboardSnapshot, ProductSource, RestProductSource,
};
use shared::state::{
    sort_label, CategoryFilter, FilterState, ParseStateError, SortState, StockStatus,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inventory-dashboard", about = "Browse the product inventory")]
struct Cli {
    /// Dashboard URL or bare query string to start from, e.g. `page=2&name=lamp`.
    #[arg(long, default_value = "")]
    location: String,
    #[command(flatten)]
    edits: Edits,
    #[command(subcommand)]
    command: Option<Command>,
}

/// Edits applied after the initial load, in the order listed.
#[derive(Args, Debug, Default)]
struct Edits {
    /// Reset filters, sort and page before applying any other edit.
    #[arg(long)]
    clear: bool,
    #[arg(long)]
    name: Option<String>,
    /// Category id, or `all`.
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<String>,
    #[arg(long)]
    max_price: Option<String>,
    /// all, in_stock or out_of_stock.
    #[arg(long, value_parser = parse_stock)]
    stock: Option<StockStatus>,
    /// Combined sort value such as `price_desc` or `stock_quantity_desc`.
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortState>,
    #[arg(long)]
    page: Option<u32>,
}

impl Edits {
    fn apply_to(&self, current: &FilterState) -> Option<FilterState> {
        let mut filters = current.clone();
        let mut touched = false;

        if let Some(name) = &self.name {
            filters.name = name.clone();
            touched = true;
        }
        if let Some(category) = &self.category {
            filters.category = CategoryFilter::from_value(category);
            touched = true;
        }
        if let Some(min_price) = &self.min_price {
            filters.min_price = min_price.clone();
            touched = true;
        }
        if let Some(max_price) = &self.max_price {
            filters.max_price = max_price.clone();
            touched = true;
        }
        if let Some(stock) = self.stock {
            filters.stock_status = stock;
            touched = true;
        }

        touched.then_some(filters)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the categories available for the `--category` filter.
    Categories,
}

fn parse_stock(value: &str) -> Result<StockStatus, ParseStateError> {
    value.parse()
}

fn parse_sort(value: &str) -> Result<SortState, ParseStateError> {
    SortState::from_option_value(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = load_settings();

    if let Some(Command::Categories) = cli.command {
        let source = RestProductSource::new(&settings);
        let categories = source
            .fetch_categories()
            .await
            .context("failed to fetch categories")?;
        for category in categories {
            println!("{}\t{}", category.id, category.name);
        }
        return Ok(());
    }

    let start = if cli.location.trim().is_empty() {
        settings.dashboard_url.as_str()
    } else {
        cli.location.as_str()
    };
    let location = DashboardLocation::parse(start).context("invalid --location")?;
    tracing::info!(location = location.as_str(), api_url = %settings.api_url, "opening dashboard");

    let client = DashboardClient::from_settings(&settings, location);
    client.mount().await;

    let edits = &cli.edits;
    if edits.clear {
        client.clear_filters().await;
    }
    let current = client.snapshot().await.state.filters;
    if let Some(filters) = edits.apply_to(&current) {
        client.set_filters(filters).await;
    }
    if let Some(sort) = edits.sort {
        client.set_sort(sort).await;
    }
    if let Some(page) = edits.page {
        client.set_page(page).await;
    }

    print_dashboard(&client.snapshot().await);
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    let state = &snapshot.state;
    let filters = &state.filters;

    println!("Product Inventory Dashboard");
    println!("{}", snapshot.location);
    println!(
        "name={:?} category={} min={:?} max={:?} stock={} | {}",
        filters.name,
        category_label(snapshot, &filters.category),
        filters.min_price,
        filters.max_price,
        filters.stock_status.label(),
        sort_label(&state.sort),
    );
    println!();

    for line in status_lines(&snapshot.results) {
        println!("{}", line.text());
    }

    for product in &snapshot.results.products {
        let card = ProductCard::from_record(product);
        let added = product
            .created_at_utc()
            .map(|ts| format!(" | added {}", ts.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "- {} | {} | {} | {}{added}",
            card.title, card.category, card.price, card.stock
        );
    }

    println!();
    let pagination = PaginationView::new(
        state.page,
        snapshot.results.total_products,
        snapshot.page_size,
    );
    println!("{}", pagination.label());
    if !pagination.previous_disabled {
        println!("  previous: --page {}", pagination.previous_page());
    }
    if !pagination.next_disabled {
        println!("  next:     --page {}", pagination.next_page());
    }
}

fn category_label(snapshot: &DashboardSnapshot, category: &CategoryFilter) -> String {
    match category {
        CategoryFilter::All => "All Categories".to_string(),
        CategoryFilter::Only(id) => snapshot
            .categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_without_filter_flags_leave_filters_alone() {
        let edits = Edits {
            page: Some(3),
            ..Edits::default()
        };
        assert_eq!(edits.apply_to(&FilterState::default()), None);
    }

    #[test]
    fn edits_merge_into_current_filters() {
        let current = FilterState {
            name: "lamp".to_string(),
            ..FilterState::default()
        };
        let edits = Edits {
            stock: Some(StockStatus::InStock),
            category: Some("all".to_string()),
            ..Edits::default()
        };

        let filters = edits.apply_to(&current).expect("filters touched");

        assert_eq!(filters.name, "lamp");
        assert_eq!(filters.category, CategoryFilter::All);
        assert_eq!(filters.stock_status, StockStatus::InStock);
    }

    #[test]
    fn parses_cli_flags() {
        let cli = Cli::try_parse_from([
            "inventory-dashboard",
            "--location",
            "page=3",
            "--stock",
            "out_of_stock",
            "--sort",
            "stock_quantity_desc",
        ])
        .expect("parse");

        assert_eq!(cli.location, "page=3");
        assert_eq!(cli.edits.stock, Some(StockStatus::OutOfStock));
        assert_eq!(
            cli.edits.sort.map(|s| s.option_value()),
            Some("stock_quantity_desc".to_string())
        );
        assert!(Cli::try_parse_from(["inventory-dashboard", "--sort", "price"]).is_err());
    }
}
