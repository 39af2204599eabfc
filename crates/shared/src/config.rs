//! Application configuration management.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::ResetPeriod;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persistent key-value store configuration.
    pub storage: StorageConfig,
    /// Document number counter overrides.
    pub numbering: NumberingConfig,
    /// Customization resolver inputs.
    pub customization: CustomizationConfig,
    /// Export surface configuration.
    pub export: ExportConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Workflow policy configuration.
    pub workflow: WorkflowConfig,
}

/// Which key-value backend holds documents, counters and settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit.
    Memory,
    /// One JSON file per key under `data_dir`.
    #[default]
    File,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// A configured counter for one document or entity type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CounterConfig {
    /// Value substituted for `{prefix}`.
    pub prefix: String,
    /// Format string, e.g. `INV-{year}-{number:0000}`.
    #[serde(default = "default_counter_format")]
    pub format: String,
    /// First number issued after creation or a reset.
    #[serde(default = "default_start_from")]
    pub start_from: u64,
    /// When the counter starts over.
    #[serde(default)]
    pub reset_period: ResetPeriod,
}

fn default_counter_format() -> String {
    "{prefix}-{number:0000}".to_string()
}

fn default_start_from() -> u64 {
    1
}

/// Numbering configuration.
///
/// Entries here are layered over the built-in counter rules, keyed by
/// document type (`invoice`, `quote`, ...) or entity type (`customer`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NumberingConfig {
    /// Counter overrides by key.
    #[serde(default)]
    pub counters: BTreeMap<String, CounterConfig>,
}

/// Customization resolver configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomizationConfig {
    /// Document total above which premium styling applies.
    #[serde(default = "default_high_value_threshold")]
    pub high_value_threshold: Decimal,
    /// Primary color used by premium styling.
    #[serde(default = "default_premium_color")]
    pub premium_color: String,
    /// Named presets applied to every resolution, in order.
    #[serde(default)]
    pub default_presets: Vec<String>,
    /// Accent color by customer industry (lowercase key).
    #[serde(default = "default_industry_accents")]
    pub industry_accents: BTreeMap<String, String>,
}

fn default_high_value_threshold() -> Decimal {
    Decimal::from(100_000)
}

fn default_premium_color() -> String {
    "#8a6d1d".to_string()
}

fn default_industry_accents() -> BTreeMap<String, String> {
    [
        ("construction", "#c2410c"),
        ("healthcare", "#0f766e"),
        ("hospitality", "#be185d"),
        ("technology", "#4338ca"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for CustomizationConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: default_high_value_threshold(),
            premium_color: default_premium_color(),
            default_presets: Vec::new(),
            industry_accents: default_industry_accents(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving downloaded artifacts and print jobs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./exports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "docket=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// What happens when an already-converted document is converted again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconversionPolicy {
    /// Proceed and log a warning.
    #[default]
    Warn,
    /// Refuse with an invalid-state error.
    Reject,
}

/// Workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Re-conversion policy.
    #[serde(default)]
    pub reconversion: ReconversionPolicy,
    /// Days between invoice date and due date on converted invoices.
    #[serde(default = "default_invoice_due_days")]
    pub invoice_due_days: u32,
    /// Days a new quote stays valid.
    #[serde(default = "default_quote_validity_days")]
    pub quote_validity_days: u32,
}

fn default_invoice_due_days() -> u32 {
    30
}

fn default_quote_validity_days() -> u32 {
    30
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            reconversion: ReconversionPolicy::default(),
            invoice_due_days: default_invoice_due_days(),
            quote_validity_days: default_quote_validity_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `DOCKET__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DOCKET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
