use crate::config::Config;
use crate::prelude::{println, *};
use crate::store::{FavoritesStore, FileStorage};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

pub mod book;
pub mod list;
pub mod options;
pub mod show;
pub mod state;

#[derive(Debug, clap::Parser)]
#[command(name = "catalog")]
#[command(about = "Browse the rental car catalog")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List cars, optionally filtered by brand, price and mileage
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Show one car's full details
    #[clap(name = "show")]
    Show(show::ShowOptions),

    /// List the brands and prices the filters accept
    #[clap(name = "options")]
    Options(options::OptionsOptions),

    /// Send a booking request for a car
    #[clap(name = "book")]
    Book(book::BookOptions),

    /// Show or reset the saved catalog position
    #[clap(name = "state")]
    State(state::StateOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::from_global(&global)?;

    if global.verbose {
        println!("Catalog API Base: {}", config.api_base);
        println!("State directory: {}", config.state_dir.display());
        println!();
    }

    match app.command {
        Commands::List(options) => list::run(options, &config).await,
        Commands::Show(options) => show::run(options, &config).await,
        Commands::Options(options) => options::run(options, &config).await,
        Commands::Book(options) => book::run(options, &config).await,
        Commands::State(options) => state::run(options, &config),
    }
}

/// Accept either a bare car id or a catalog URL such as `/catalog/9582` or
/// `https://rentalcar.example/catalog/9582?tab=reviews`.
pub fn extract_car_id(input: &str) -> Result<String> {
    let input = input.trim();

    let re = Regex::new(r"/catalog/([^/?#]+)").map_err(|e| eyre!("Invalid car id pattern: {}", e))?;
    if let Some(id) = re.captures(input).and_then(|caps| caps.get(1)) {
        return Ok(id.as_str().to_string());
    }

    if !input.is_empty() && !input.contains('/') {
        return Ok(input.to_string());
    }

    Err(Error::InvalidInput(f!("Invalid car id or URL: {}", input)).into())
}

pub(crate) fn open_favorites(config: &Config) -> FavoritesStore<FileStorage> {
    FavoritesStore::load(FileStorage::new(&config.state_dir))
}

/// Steady-ticking spinner shown while requests are in flight.
pub(crate) fn spinner(msg: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("Invalid spinner template: {}", e))?,
    );
    spinner.set_message(msg.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}
