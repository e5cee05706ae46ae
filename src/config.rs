//! Configuration.
//!
//! Everything the pipeline parameterizes on lives here: the billed
//! account, the period table (label → billing window → artifact names),
//! the fixed price constants, inventory naming, and logging. Loaded from
//! a TOML file with environment overrides and validated up front; the
//! resulting value is passed explicitly into collectors and queries —
//! there is no process-wide configuration state.

use crate::error::{Error, Result as CoreResult};
use crate::models::Period;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Billed account
    pub account: AccountConfig,

    /// File locations
    pub paths: PathsConfig,

    /// Inventory snapshot naming
    pub inventory: InventoryConfig,

    /// Fixed unit prices per service
    pub prices: PriceTable,

    /// Known billing periods, in display order
    pub periods: Vec<PeriodConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding billing exports, metric snapshots, and datasets
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Inventory snapshot file, relative to `data_dir` unless absolute
    pub snapshot: PathBuf,
    /// Top-level key the platform's resources live under
    pub prefix: String,
    /// Prefix prepended to ECR repository names from the inventory
    pub ecr_repo_prefix: String,
}

/// Fixed unit prices. These are configuration, never derived; defaults
/// are the ap-northeast-1 rates the dashboard was built against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    pub ecr_gb_month: f64,
    pub dynamodb_gb_month: f64,
    pub s3_gb_month: f64,
    pub ebs_gp2_gb_month: f64,
    pub kms_key_month: f64,
    pub kms_per_10k_requests: f64,
    pub vpn_connection_hourly: f64,
    pub vpn_hours_per_month: f64,
    pub vpc_egress_gb: f64,
    pub nlb_hourly: f64,
    pub nlb_lcu_hourly: f64,
    pub nlb_hours_per_month: f64,
    pub nat_hourly: f64,
    pub nat_data_gb: f64,
    pub nat_hours_per_month: f64,
}

/// One period mapping: label, window, and the three per-period files
/// (all relative to `data_dir` unless absolute).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub billing_export: PathBuf,
    pub metrics: PathBuf,
    pub dataset: PathBuf,
}

impl PeriodConfig {
    pub fn period(&self) -> Period {
        Period {
            label: self.label.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "ERROR".to_string(),
                format: "pretty".to_string(),
                output: "console".to_string(),
                directory: PathBuf::from("logs"),
            },
            account: AccountConfig {
                account_id: "000000000000".to_string(),
            },
            paths: PathsConfig {
                data_dir: PathBuf::from("."),
            },
            inventory: InventoryConfig {
                snapshot: PathBuf::from("resources.json"),
                prefix: "model-inference".to_string(),
                ecr_repo_prefix: "prod/".to_string(),
            },
            prices: PriceTable::default(),
            periods: vec![
                period_entry("feb-2025", (2025, 2, 1), (2025, 2, 24), "all_costs.csv"),
                period_entry("jan-2025", (2025, 1, 1), (2025, 1, 31), "all_costs-jan.csv"),
                period_entry("dec-2024", (2024, 12, 1), (2024, 12, 31), "all_costs-dec.csv"),
            ],
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            ecr_gb_month: 0.10,
            dynamodb_gb_month: 0.285,
            s3_gb_month: 0.023,
            ebs_gp2_gb_month: 0.12,
            kms_key_month: 1.0,
            kms_per_10k_requests: 0.03,
            vpn_connection_hourly: 0.005,
            vpn_hours_per_month: 720.0,
            vpc_egress_gb: 0.09,
            nlb_hourly: 0.0225,
            nlb_lcu_hourly: 0.006,
            nlb_hours_per_month: 730.0,
            nat_hourly: 0.062,
            nat_data_gb: 0.062,
            nat_hours_per_month: 744.0,
        }
    }
}

fn period_entry(
    label: &str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    dataset: &str,
) -> PeriodConfig {
    PeriodConfig {
        label: label.to_string(),
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).expect("valid date"),
        billing_export: PathBuf::from(format!("costs-{label}.csv")),
        metrics: PathBuf::from(format!("metrics-{label}.json")),
        dataset: PathBuf::from(dataset),
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("costboard.toml"),
            PathBuf::from(".costboard.toml"),
            dirs::config_dir()
                .map(|d| d.join("costboard").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Ok(val) = env::var("COSTBOARD_ACCOUNT_ID") {
            self.account.account_id = val;
        }
        if let Ok(val) = env::var("COSTBOARD_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("COSTBOARD_INVENTORY") {
            self.inventory.snapshot = PathBuf::from(val);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.periods.is_empty() {
            anyhow::bail!("At least one period must be configured");
        }

        let mut labels: Vec<&str> = self.periods.iter().map(|p| p.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        if labels.len() != self.periods.len() {
            anyhow::bail!("Period labels must be unique");
        }

        for period in &self.periods {
            if period.start_date > period.end_date {
                anyhow::bail!(
                    "Period {} has start_date after end_date",
                    period.label
                );
            }
        }

        if self.account.account_id.is_empty() {
            anyhow::bail!("account_id must not be empty");
        }

        Ok(())
    }

    /// Look up a period by label.
    pub fn period(&self, label: &str) -> Option<&PeriodConfig> {
        self.periods.iter().find(|p| p.label == label)
    }

    /// Look up a period by label, failing with `PeriodUnknown`.
    pub fn period_required(&self, label: &str) -> CoreResult<&PeriodConfig> {
        self.period(label)
            .ok_or_else(|| Error::PeriodUnknown(label.to_string()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.data_dir.join(path)
        }
    }

    pub fn billing_path(&self, period: &PeriodConfig) -> PathBuf {
        self.resolve(&period.billing_export)
    }

    pub fn metrics_path(&self, period: &PeriodConfig) -> PathBuf {
        self.resolve(&period.metrics)
    }

    pub fn dataset_path(&self, period: &PeriodConfig) -> PathBuf {
        self.resolve(&period.dataset)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.resolve(&self.inventory.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "ERROR");
        assert_eq!(config.periods.len(), 3);
        assert_eq!(config.periods[0].label, "feb-2025");
        assert_eq!(config.prices.dynamodb_gb_month, 0.285);
        config.validate().unwrap();
    }

    #[test]
    fn test_env_override() {
        env::set_var("COSTBOARD_ACCOUNT_ID", "123456789012");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.account.account_id, "123456789012");
        env::remove_var("COSTBOARD_ACCOUNT_ID");
    }

    #[test]
    fn test_validation_rejects_duplicate_labels() {
        let mut config = Config::default();
        let dup = config.periods[0].clone();
        config.periods.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_window() {
        let mut config = Config::default();
        config.periods[0].start_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        config.periods[0].end_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_period_lookup() {
        let config = Config::default();
        assert!(config.period("jan-2025").is_some());
        assert!(config.period("mar-2025").is_none());
        assert!(matches!(
            config.period_required("mar-2025"),
            Err(Error::PeriodUnknown(_))
        ));
    }

    #[test]
    fn test_paths_resolve_against_data_dir() {
        let mut config = Config::default();
        config.paths.data_dir = PathBuf::from("/var/lib/costboard");
        let period = config.period("feb-2025").unwrap();
        assert_eq!(
            config.dataset_path(period),
            PathBuf::from("/var/lib/costboard/all_costs.csv")
        );
        assert_eq!(
            config.inventory_path(),
            PathBuf::from("/var/lib/costboard/resources.json")
        );
    }
}
