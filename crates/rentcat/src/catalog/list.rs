use crate::api::HttpCatalog;
use crate::config::Config;
use crate::prelude::{println, *};
use crate::session::CatalogSession;
use crate::store::{FileStorage, PageCursorStore};
use colored::Colorize;
use rentcat_core::catalog::{to_card, CarCard};
use rentcat_core::filter::{decode_query_string, Filter, SearchForm};
use rentcat_core::pagination::MoreDecision;
use serde::Serialize;

use super::{open_favorites, spinner};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct ListOptions {
    /// Car brand (e.g., "BMW")
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Price per hour; currency symbols are ignored (e.g., "$40")
    #[arg(short, long)]
    pub price: Option<String>,

    /// Minimum mileage in km; separators are ignored (e.g., "5 000")
    #[arg(long)]
    pub min_mileage: Option<String>,

    /// Maximum mileage in km
    #[arg(long)]
    pub max_mileage: Option<String>,

    /// Catalog query string or URL instead of the filter flags
    /// (e.g., "/catalog?brand=BMW&rentalPrice=40")
    #[arg(short, long, conflicts_with_all = ["brand", "price", "min_mileage", "max_mileage"])]
    pub query: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pub pages: usize,

    /// Keep loading until the catalog runs out
    #[arg(long)]
    pub all: bool,

    /// Reload up to the saved page when the filters match the saved ones
    #[arg(long)]
    pub resume: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    fn search_form(&self) -> SearchForm {
        SearchForm {
            brand: self.brand.clone().unwrap_or_default(),
            rental_price: self.price.clone().unwrap_or_default(),
            min_mileage: self.min_mileage.clone().unwrap_or_default(),
            max_mileage: self.max_mileage.clone().unwrap_or_default(),
        }
    }

    /// Filter to list with and the catalog location it corresponds to.
    pub fn resolve(&self) -> (Filter, String) {
        match &self.query {
            Some(query) => {
                let query = query.split_once('?').map(|(_, q)| q).unwrap_or(query);
                let filter = decode_query_string(query);
                let url = catalog_url(&filter);
                (filter, url)
            }
            None => {
                let form = self.search_form();
                (form.to_filter(), form.catalog_url())
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub catalog_url: String,
    pub filter: Filter,
    pub cards: Vec<CarCard>,
    pub pages_loaded: u32,
    pub has_more: bool,
    pub decision: Option<MoreDecision>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_warning: Option<String>,
}

pub async fn run(options: ListOptions, config: &Config) -> Result<()> {
    let (filter, catalog_url) = options.resolve();
    log::debug!("listing {} as {:?}", catalog_url, filter);

    let api = HttpCatalog::new(config)?;
    let cursor = PageCursorStore::load(FileStorage::new(&config.state_dir));
    let favorites = open_favorites(config);
    let mut session = CatalogSession::new(&api, cursor);

    let spinner = spinner("Loading cars...")?;
    session.open(filter, options.resume).await?;

    while session.error().is_none()
        && session.has_more()
        && (options.all || (session.pages_loaded() as usize) < options.pages)
    {
        spinner.set_message(f!("Loading page {}...", session.pages_loaded() + 1));
        if session.load_more().await?.is_none() {
            break;
        }
    }
    spinner.finish_and_clear();

    let output = ListOutput {
        catalog_url,
        filter: session.filter().clone(),
        cards: session
            .items()
            .iter()
            .map(|car| to_card(car, favorites.is_favorite(&car.id)))
            .collect(),
        pages_loaded: session.pages_loaded(),
        has_more: session.has_more(),
        decision: session.decision(),
        error: session.error().map(str::to_string),
        storage_warning: session.storage_warning().map(str::to_string),
    };

    if options.json {
        println!("{}", format_list_json(&output)?);
    } else {
        println!("{}", format_list_text(&output));
    }

    Ok(())
}

fn catalog_url(filter: &Filter) -> String {
    let query = filter.to_query_string();
    if query.is_empty() {
        "/catalog".to_string()
    } else {
        f!("/catalog?{query}")
    }
}

/// Command-line flags that reproduce `filter`.
pub fn filter_args(filter: &Filter) -> String {
    let mut args = Vec::new();

    if let Some(brand) = &filter.brand {
        args.push(f!("--brand {}", shell_quote(brand)));
    }
    if let Some(price) = filter.rental_price {
        args.push(f!("--price {price}"));
    }
    if let Some(min) = filter.min_mileage {
        args.push(f!("--min-mileage {min}"));
    }
    if let Some(max) = filter.max_mileage {
        args.push(f!("--max-mileage {max}"));
    }

    args.join(" ")
}

/// Quote `value` for a POSIX shell when it holds anything beyond plain word
/// characters. Single quotes inside are written as `'\''`.
fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '+' | ','));
    if plain {
        value.to_string()
    } else {
        f!("'{}'", value.replace('\'', "'\\''"))
    }
}

fn list_command(filter: &Filter, pages: u32) -> String {
    let args = filter_args(filter);
    if args.is_empty() {
        f!("rentcat catalog list --resume --pages {pages}")
    } else {
        f!("rentcat catalog list {args} --resume --pages {pages}")
    }
}

fn format_list_json(output: &ListOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Convert list output to formatted text with colors
fn format_list_text(output: &ListOutput) -> String {
    let mut result = String::new();

    // Header
    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!(
            "RENTAL CARS ({} loaded, {} page(s))",
            output.cards.len(),
            output.pages_loaded
        )
        .bright_cyan()
        .bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}: {}\n",
        "Catalog".green(),
        output.catalog_url.bright_white()
    ));

    if output.cards.is_empty() && output.error.is_none() {
        result.push_str(&f!("\n{}\n", "No cars match these filters.".yellow()));
    }

    for (idx, card) in output.cards.iter().enumerate() {
        let year = card.year.map(|y| f!(" ({y})")).unwrap_or_default();
        let marker = if card.favorite {
            f!(" {}", "♥".bright_red())
        } else {
            String::new()
        };

        result.push_str(&f!(
            "\n{} {}{}{}\n",
            f!("[{}]", idx + 1).yellow().bold(),
            card.title.white().bold(),
            year.bright_black(),
            marker
        ));
        result.push_str(&f!(
            "    {}: {} | {}: {} | {}: {}\n",
            "Price".green(),
            card.price.bright_yellow(),
            "Location".green(),
            card.location.bright_white(),
            "Company".green(),
            card.rental_company.bright_white()
        ));
        result.push_str(&f!(
            "    {}: {} | {}: {}\n",
            "Type".green(),
            card.car_type.bright_white(),
            "Mileage".green(),
            card.mileage.bright_magenta()
        ));
        result.push_str(&f!(
            "    {}: {} | {}: {}\n",
            "ID".green(),
            card.id.bright_white(),
            "Details".green(),
            card.details_command.cyan()
        ));
    }

    if let Some(warning) = &output.storage_warning {
        result.push_str(&f!(
            "\n{} {}\n",
            "Catalog position not saved:".yellow().bold(),
            warning
        ));
    }

    if let Some(error) = &output.error {
        result.push_str(&f!(
            "\n{} {}\n",
            "Failed to load cars:".red().bold(),
            error
        ));
        result.push_str(&f!(
            "  {}: {}\n",
            "Retry".green(),
            list_command(&output.filter, output.pages_loaded + 1).cyan()
        ));
        return result;
    }

    // Navigation section
    if output.has_more {
        result.push_str(&f!("\n{}\n", "=".repeat(80).bright_yellow()));
        result.push_str(&f!("{}\n", "NAVIGATION".bright_yellow().bold()));
        result.push_str(&f!("{}\n", "=".repeat(80).bright_yellow()));
        result.push_str(&f!(
            "  {}: {}\n",
            "Load more".green(),
            list_command(&output.filter, output.pages_loaded + 1).cyan()
        ));
    }

    result
}
