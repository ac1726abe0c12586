use crate::api::{CatalogApi, HttpCatalog};
use crate::config::Config;
use crate::prelude::{println, *};
use colored::Colorize;
use rentcat_core::catalog::{to_view, CarView};

use super::{extract_car_id, open_favorites, spinner};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShowOptions {
    /// Car ID or catalog URL (e.g., "9582" or "https://rentalcar.example/catalog/9582")
    pub car: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ShowOptions, config: &Config) -> Result<()> {
    let id = extract_car_id(&options.car)?;

    let api = HttpCatalog::new(config)?;
    let spinner = spinner(f!("Fetching car {id}..."))?;
    let car = api.get_car(&id).await;
    spinner.finish_and_clear();

    let favorites = open_favorites(config);
    let view = to_view(&car?, favorites.is_favorite(&id));

    if options.json {
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", format_view_text(&view));
    }

    Ok(())
}

fn section(result: &mut String, title: &str) {
    result.push_str(&f!("\n{}\n", title.bright_yellow().bold()));
    result.push_str(&f!("{}\n", "-".repeat(40).bright_black()));
}

fn format_view_text(view: &CarView) -> String {
    let mut result = String::new();

    let year = view.year.map(|y| f!(", {y}")).unwrap_or_default();
    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!("{} {}{}", view.brand, view.model, year)
            .bright_cyan()
            .bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&f!(
        "{}: {} | {}: {} | {}: {}\n",
        "ID".green(),
        view.id.bright_white(),
        "Location".green(),
        view.location.bright_white(),
        "Mileage".green(),
        view.mileage.bright_magenta()
    ));
    result.push_str(&f!("{}: {}\n", "Price".green(), view.price.bright_yellow()));
    if view.favorite {
        result.push_str(&f!("{}\n", "♥ In your favorites".bright_red()));
    }
    if !view.img.is_empty() {
        result.push_str(&f!("{}: {}\n", "Image".green(), view.img.cyan().underline()));
    }

    if let Some(description) = view.description.as_deref().filter(|d| !d.is_empty()) {
        result.push_str(&f!("\n{}\n", description));
    }

    if !view.rental_conditions.is_empty() {
        section(&mut result, "Rental Conditions");
        for condition in &view.rental_conditions {
            result.push_str(&f!("  • {}\n", condition));
        }
    }

    section(&mut result, "Car Specifications");
    for (label, value) in &view.specifications {
        result.push_str(&f!("  {}: {}\n", label.green(), value));
    }

    if !view.features.is_empty() {
        section(&mut result, "Accessories and functionalities");
        for feature in &view.features {
            result.push_str(&f!("  • {}\n", feature));
        }
    }

    result.push_str(&f!("\n{}:\n", "Next".bright_white().bold()));
    result.push_str(&f!(
        "  {}: {}\n",
        "Book".green(),
        f!(
            "rentcat catalog book {} --name <NAME> --email <EMAIL>",
            view.id
        )
        .cyan()
    ));
    result.push_str(&f!(
        "  {}: {}\n",
        "Favorite".green(),
        f!("rentcat favorites toggle {}", view.id).cyan()
    ));

    result
}
