use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration for the pipeline. Every field has a default pointing at
/// the archived largest-banks snapshot, so the binary works out of the box; a
/// TOML file can override any subset of them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Page snapshot the table is extracted from.
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// Where the flat-file sink writes the dataset.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// SQLite database file for the relational sink.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Table replaced on every run.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Reference CSV mapping currency codes to rates (`Currency,Rate` header).
    #[serde(default = "default_exchange_rate_path")]
    pub exchange_rate_path: PathBuf,
    /// Append-only run log recording stage boundaries.
    #[serde(default = "default_progress_log_path")]
    pub progress_log_path: PathBuf,
}

fn default_source_url() -> String {
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks"
        .to_string()
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("Largest_banks_data.csv")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("Banks.db")
}

fn default_table_name() -> String {
    "Largest_banks".to_string()
}

fn default_exchange_rate_path() -> PathBuf {
    PathBuf::from("exchange_rate.csv")
}

fn default_progress_log_path() -> PathBuf {
    PathBuf::from("etl_project_log.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            csv_path: default_csv_path(),
            db_path: default_db_path(),
            table_name: default_table_name(),
            exchange_rate_path: default_exchange_rate_path(),
            progress_log_path: default_progress_log_path(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the given path when one is supplied, otherwise from
    /// `config.toml` in the working directory when that exists, otherwise
    /// falls back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
