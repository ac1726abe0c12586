use crate::api::{CatalogApi, HttpCatalog};
use crate::config::Config;
use crate::prelude::{println, *};
use colored::Colorize;
use rentcat_core::booking::{submit, BookingConfirmation, BookingForm};

use super::{extract_car_id, spinner};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookOptions {
    /// Car ID or catalog URL
    pub car: String,

    /// Your name
    #[arg(long)]
    pub name: String,

    /// Your email address
    #[arg(long)]
    pub email: String,

    /// Booking date, YYYY-MM-DD or DD.MM.YYYY; today or later
    #[arg(long)]
    pub date: Option<String>,

    /// Anything the rental company should know
    #[arg(long)]
    pub comment: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: BookOptions, config: &Config) -> Result<()> {
    let id = extract_car_id(&options.car)?;

    let api = HttpCatalog::new(config)?;
    let spinner = spinner(f!("Checking car {id}..."))?;
    let car = api.get_car(&id).await;
    spinner.finish_and_clear();
    let car = car?;

    let form = BookingForm {
        name: options.name,
        email: options.email,
        booking_date: options.date,
        comment: options.comment,
    };
    let confirmation = submit(form, &id, chrono::Local::now().date_naive())
        .map_err(|e| Error::InvalidInput(e.to_string()))?;
    log::debug!("booking form for car {} accepted", id);

    if options.json {
        let json = serde_json::to_string_pretty(&confirmation)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        let title = f!("{} {}", car.summary.brand, car.summary.model);
        println!("{}", format_confirmation(&confirmation, title.trim()));
    }

    Ok(())
}

fn format_confirmation(confirmation: &BookingConfirmation, title: &str) -> String {
    let mut result = String::new();

    result.push_str(&f!(
        "\n{} {}\n",
        "Book your car now:".bright_cyan().bold(),
        title.white().bold()
    ));
    if let Some(date) = &confirmation.booking_date {
        result.push_str(&f!("  {}: {}\n", "Date".green(), date.bright_white()));
    }
    result.push_str(&f!("\n{}\n", confirmation.message.bright_green()));

    result
}
