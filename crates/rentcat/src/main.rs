use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod catalog;
mod config;
mod error;
mod favorites;
mod prelude;
mod session;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse, filter and bookmark rental cars from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Car rental API base URL
    #[clap(
        long,
        env = "RENTCAT_API_BASE",
        global = true,
        default_value = config::DEFAULT_API_BASE
    )]
    api_base: String,

    /// Directory holding favorites and the saved catalog position
    #[clap(long, env = "RENTCAT_STATE_DIR", global = true)]
    state_dir: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "RENTCAT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Browse the rental car catalog
    Catalog(crate::catalog::App),

    /// Manage favorite cars
    Favorites(crate::favorites::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Catalog(sub_app) => crate::catalog::run(sub_app, app.global).await,
        SubCommands::Favorites(sub_app) => crate::favorites::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
