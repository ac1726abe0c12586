use crate::api::{CatalogApi, HttpCatalog};
use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use rentcat_core::filter::price_options;
use serde::Serialize;

use super::spinner;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct OptionsOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub prices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_error: Option<String>,
}

pub async fn run(options: OptionsOptions, config: &Config) -> Result<()> {
    let api = HttpCatalog::new(config)?;

    let spinner = spinner("Fetching brands...")?;
    let brands = api.list_brands().await;
    spinner.finish_and_clear();

    let output = filter_options(brands);

    if options.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    if let Some(error) = &output.brand_error {
        eprintln!("{} {}", "Failed to load brands:".red().bold(), error);
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Brand".bold().cyan()]);
    for brand in &output.brands {
        table.add_row(prettytable::row![brand.bright_white()]);
    }
    if !output.brands.is_empty() {
        table.printstd();
    }

    println!();
    println!(
        "{}: {}",
        "Prices / 1 hour".green(),
        output
            .prices
            .iter()
            .map(|p| f!("${p}"))
            .collect::<Vec<_>>()
            .join(" ")
    );

    Ok(())
}

/// Brand list plus price choices. A brand fetch failure leaves the price list usable.
fn filter_options(brands: Result<Vec<String>>) -> FilterOptions {
    let (brands, brand_error) = match brands {
        Ok(brands) => (brands, None),
        Err(err) => {
            log::warn!("brand list unavailable: {:#}", err);
            (Vec::new(), Some(f!("{err:#}")))
        }
    };

    FilterOptions {
        brands,
        prices: price_options(),
        brand_error,
    }
}
