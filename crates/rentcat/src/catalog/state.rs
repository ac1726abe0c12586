use crate::config::Config;
use crate::prelude::{println, *};
use crate::store::{FileStorage, PageCursorStore};
use colored::Colorize;
use rentcat_core::cursor::CatalogState;

use super::list::filter_args;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct StateOptions {
    /// Forget the saved page and filters
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(options: StateOptions, config: &Config) -> Result<()> {
    let mut store = PageCursorStore::load(FileStorage::new(&config.state_dir));

    if options.reset {
        store.reset()?;
        if !options.json {
            println!("{}", "Catalog position reset.".bright_green());
            return Ok(());
        }
    }

    if options.json {
        let json = serde_json::to_string_pretty(store.state())
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", format_state_text(store.state()));
    }

    Ok(())
}

fn format_state_text(state: &CatalogState) -> String {
    let mut result = String::new();

    result.push_str(&f!("{}: {}\n", "Next page".green(), state.page.get()));

    let args = filter_args(&state.filters);
    if args.is_empty() {
        result.push_str(&f!("{}: {}\n", "Filters".green(), "none".bright_black()));
    } else {
        result.push_str(&f!("{}: {}\n", "Filters".green(), args.bright_white()));
    }

    if state.page.get() > 1 {
        let resume = if args.is_empty() {
            "rentcat catalog list --resume".to_string()
        } else {
            f!("rentcat catalog list {args} --resume")
        };
        result.push_str(&f!("{}: {}\n", "Resume".green(), resume.cyan()));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;
    use rentcat_core::filter::Filter;

    #[test]
    fn test_format_state_default() {
        let text = format_state_text(&CatalogState::default());

        assert!(text.contains("Next page"));
        assert!(text.contains("none"));
        assert!(!text.contains("--resume"));
    }

    #[test]
    fn test_format_state_with_filters() {
        let mut store = PageCursorStore::load(MemoryStorage::default());
        store
            .remember_filters(Filter {
                brand: Some("Volvo".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.set_page(3).unwrap();

        let text = format_state_text(store.state());

        assert!(text.contains("--brand Volvo"));
        assert!(text.contains("rentcat catalog list --brand Volvo --resume"));
    }
}
