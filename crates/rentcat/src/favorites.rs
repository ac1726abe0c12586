use crate::api::{CatalogApi, HttpCatalog};
use crate::catalog::{extract_car_id, open_favorites, spinner};
use crate::config::Config;
use crate::prelude::{println, *};
use colored::Colorize;
use futures::future::join_all;
use rentcat_core::catalog::{to_card, CarCard};
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(name = "favorites")]
#[command(about = "Manage favorite cars")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Add a car to favorites, or remove it if it is already there
    #[clap(name = "toggle")]
    Toggle(CarOptions),

    /// Tell whether a car is a favorite
    #[clap(name = "check")]
    Check(CarOptions),

    /// List favorite cars
    #[clap(name = "list")]
    List(ListOptions),

    /// Remove every favorite
    #[clap(name = "clear")]
    Clear,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct CarOptions {
    /// Car ID or catalog URL
    pub car: String,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Fetch each favorite's details from the catalog
    #[arg(short, long)]
    pub details: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoritesOutput {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cars: Vec<CarCard>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<String>,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::from_global(&global)?;

    if global.verbose {
        println!("State directory: {}", config.state_dir.display());
        println!();
    }

    match app.command {
        Commands::Toggle(options) => toggle(options, &config),
        Commands::Check(options) => check(options, &config),
        Commands::List(options) => list(options, &config).await,
        Commands::Clear => clear(&config),
    }
}

fn toggle(options: CarOptions, config: &Config) -> Result<()> {
    let id = extract_car_id(&options.car)?;
    let mut favorites = open_favorites(config);

    if favorites.toggle(&id)? {
        println!("{} {}", "♥ Added".bright_red().bold(), id.bright_white());
    } else {
        println!("{} {}", "Removed".bright_black().bold(), id.bright_white());
    }

    Ok(())
}

fn check(options: CarOptions, config: &Config) -> Result<()> {
    let id = extract_car_id(&options.car)?;
    let favorites = open_favorites(config);

    if favorites.is_favorite(&id) {
        println!("{} is a favorite", id.bright_white());
    } else {
        println!("{} is not a favorite", id.bright_white());
    }

    Ok(())
}

fn clear(config: &Config) -> Result<()> {
    let mut favorites = open_favorites(config);
    let count = favorites.len();
    favorites.clear()?;

    println!("Removed {} favorite(s)", count.to_string().bold());
    Ok(())
}

async fn list(options: ListOptions, config: &Config) -> Result<()> {
    let favorites = open_favorites(config);
    let ids = favorites.ids();

    let output = if options.details && !favorites.is_empty() {
        let api = HttpCatalog::new(config)?;
        let spinner = spinner(f!("Fetching {} favorite(s)...", ids.len()))?;
        let output = favorites_data(&api, ids).await;
        spinner.finish_and_clear();
        output
    } else {
        FavoritesOutput {
            ids,
            cars: Vec::new(),
            unavailable: Vec::new(),
        }
    };

    if options.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", format_favorites_text(&output));
    }

    Ok(())
}

/// Fetch details for every favorite in parallel. Ids the catalog cannot serve are
/// reported as unavailable instead of failing the whole listing.
pub async fn favorites_data<A: CatalogApi>(api: &A, ids: Vec<String>) -> FavoritesOutput {
    let results = join_all(ids.iter().map(|id| api.get_car(id))).await;

    let mut cars = Vec::new();
    let mut unavailable = Vec::new();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(car) => cars.push(to_card(&car.summary, true)),
            Err(err) => {
                log::warn!("favorite {} unavailable: {:#}", id, err);
                unavailable.push(id.clone());
            }
        }
    }

    FavoritesOutput {
        ids,
        cars,
        unavailable,
    }
}

fn format_favorites_text(output: &FavoritesOutput) -> String {
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!("FAVORITES ({})", output.ids.len()).bright_cyan().bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if output.ids.is_empty() {
        result.push_str(&f!(
            "\n{}\n  {}\n",
            "No favorites yet. Add one with:".yellow(),
            "rentcat favorites toggle <CAR>".cyan()
        ));
        return result;
    }

    if output.cars.is_empty() && output.unavailable.is_empty() {
        for id in &output.ids {
            result.push_str(&f!(
                "  {} {}\n",
                "♥".bright_red(),
                f!("rentcat catalog show {id}").cyan()
            ));
        }
        return result;
    }

    for card in &output.cars {
        let year = card.year.map(|y| f!(" ({y})")).unwrap_or_default();
        result.push_str(&f!(
            "\n{} {}{}\n",
            "♥".bright_red(),
            card.title.white().bold(),
            year.bright_black()
        ));
        result.push_str(&f!(
            "    {}: {} | {}: {} | {}: {}\n",
            "Price".green(),
            card.price.bright_yellow(),
            "Location".green(),
            card.location.bright_white(),
            "Mileage".green(),
            card.mileage.bright_magenta()
        ));
        result.push_str(&f!(
            "    {}: {}\n",
            "Details".green(),
            card.details_command.cyan()
        ));
    }

    if !output.unavailable.is_empty() {
        result.push_str(&f!(
            "\n{} {}\n",
            "Could not load:".red().bold(),
            output.unavailable.join(", ")
        ));
    }

    result
}
