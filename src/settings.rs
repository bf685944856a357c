//! Settings for the report binary.
//!
//! Resolved in order: built-in defaults, an optional `pmtct_report.toml` in
//! the working directory, then `PMTCT_*` environment variables
//! (e.g. `PMTCT_INPUT_PATH=data/q1.csv`).

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "pmtct_report";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// CSV export to load.
    pub input_path: PathBuf,
    /// Where reports and exports are written.
    pub output_dir: PathBuf,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Append derived quarter/year columns to the filtered export.
    pub include_period_columns: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("pmtct_data.csv"),
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            include_period_columns: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("input_path", defaults.input_path.to_string_lossy().to_string())?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("log_level", defaults.log_level)?
            .set_default("include_period_columns", defaults.include_period_columns)?
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(Environment::with_prefix("PMTCT"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
