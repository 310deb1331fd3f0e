use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use engine::{Backend, StorageConfig};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/mercado.toml";

/// How planning edits reach the spreadsheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStyle {
    /// Edit the grid, write everything with `s`.
    #[default]
    Grid,
    /// Quantity, unit, category and deletions are written as soon as they happen.
    Instant,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub log_level: String,
    pub log_file: PathBuf,
    pub list_prefix: String,
    pub plan_style: PlanStyle,
    pub hide_zero_totals: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_level: "info".to_string(),
            log_file: PathBuf::from("mercado_tui.log"),
            list_prefix: "Lista".to_string(),
            plan_style: PlanStyle::Grid,
            hide_zero_totals: false,
        }
    }
}

impl AppConfig {
    /// Name suggested for a list created on `date`, e.g. `Lista 2024-06-01`.
    pub fn default_list_name(&self, date: NaiveDate) -> String {
        format!("{} {}", self.list_prefix.trim(), date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Parser)]
#[command(name = "mercado_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the storage backend (memory, csv, sheets).
    #[arg(long)]
    backend: Option<Backend>,
    /// Override the directory of the csv backend.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the spreadsheet id (the access token is never read from CLI).
    #[arg(long)]
    spreadsheet_id: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("MERCADO")
            .prefix_separator("_")
            .separator("__"),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(backend) = args.backend {
        settings.storage.backend = backend;
    }
    if let Some(data_dir) = args.data_dir {
        settings.storage.data_dir = data_dir;
    }
    if let Some(spreadsheet_id) = args.spreadsheet_id {
        settings.storage.spreadsheet_id = spreadsheet_id;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_uses_prefix_and_date() {
        let config = AppConfig {
            list_prefix: " Compras ".to_string(),
            ..AppConfig::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(config.default_list_name(date), "Compras 2024-06-01");
    }

    #[test]
    fn toml_settings_deserialize() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                plan_style = "instant"
                hide_zero_totals = true

                [storage]
                backend = "memory"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.plan_style, PlanStyle::Instant);
        assert!(settings.hide_zero_totals);
        assert_eq!(settings.storage.backend, Backend::Memory);
        assert_eq!(settings.list_prefix, "Lista");
    }
}
