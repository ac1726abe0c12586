use crate::prelude::*;
use std::path::PathBuf;

/// Default base URL of the car rental API.
pub const DEFAULT_API_BASE: &str = "https://car-rental-api.goit.global";

/// Runtime configuration resolved from global flags and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub state_dir: PathBuf,
}

impl Config {
    /// Resolve configuration from the global CLI options.
    ///
    /// `--api-base` / `RENTCAT_API_BASE` falls back to [`DEFAULT_API_BASE`];
    /// `--state-dir` / `RENTCAT_STATE_DIR` falls back to `<data dir>/rentcat`.
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let api_base = global.api_base.trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(eyre!("API base URL cannot be empty"));
        }

        let state_dir = match &global.state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir()?,
        };

        Ok(Self {
            api_base,
            state_dir,
        })
    }
}

/// Get the per-user directory where favorites and catalog state live
fn default_state_dir() -> Result<PathBuf> {
    let data_dir = dirs_next::data_dir().ok_or_else(|| eyre!("Unable to determine data directory"))?;
    Ok(data_dir.join("rentcat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(api_base: &str, state_dir: Option<&str>) -> crate::Global {
        crate::Global {
            api_base: api_base.to_string(),
            state_dir: state_dir.map(PathBuf::from),
            verbose: false,
        }
    }

    #[test]
    fn test_from_global_trims_trailing_slash() {
        let config = Config::from_global(&global("https://example.com/", Some("/tmp/rc"))).unwrap();

        assert_eq!(config.api_base, "https://example.com");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/rc"));
    }

    #[test]
    fn test_from_global_rejects_empty_base() {
        assert!(Config::from_global(&global("/", Some("/tmp/rc"))).is_err());
    }
}
