//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub company: CompanyConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub defaults: SaleDefaults,

    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,

    /// How long a connection waits on a locked database before erroring.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Retention cap for the purchase ledger.
    #[serde(default = "default_max_recent_purchases")]
    pub max_recent_purchases: u32,
}

/// Data directory layout: seed files, exports, backups, interaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

/// Company identity used in prompts and fallback replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_name")]
    pub name: String,

    #[serde(default = "default_company_email")]
    pub email: String,

    #[serde(default = "default_alert_email")]
    pub alert_email: String,
}

/// Text-completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "none" disables the integration; "openai_compatible" enables it
    /// when endpoint, model and api_key are all present.
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Field defaults applied when a sale leaves them blank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDefaults {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub tax_rate: f64,

    #[serde(default = "default_payment_status")]
    pub payment_status: String,

    #[serde(default = "default_fulfillment_status")]
    pub fulfillment_status: String,

    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub sales_rep: String,
}

/// Daily report thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_daily_sales_target")]
    pub daily_sales_target: i64,

    #[serde(default = "default_low_sales_threshold")]
    pub low_sales_threshold: i64,
}

// Default value functions
fn default_database_path() -> String {
    "data/salesdesk.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_max_recent_purchases() -> u32 {
    10
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_company_name() -> String {
    "Your Company".to_string()
}

fn default_company_email() -> String {
    "sales@yourcompany.com".to_string()
}

fn default_alert_email() -> String {
    "manager@yourcompany.com".to_string()
}

fn default_llm_provider() -> String {
    "none".to_string()
}

fn default_max_tokens() -> u32 {
    600
}

fn default_temperature() -> f64 {
    0.7
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_payment_status() -> String {
    "Paid".to_string()
}

fn default_fulfillment_status() -> String {
    "Delivered".to_string()
}

fn default_channel() -> String {
    "in-store".to_string()
}

fn default_source() -> String {
    "direct".to_string()
}

fn default_region() -> String {
    "local".to_string()
}

fn default_daily_sales_target() -> i64 {
    10
}

fn default_low_sales_threshold() -> i64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_recent_purchases: default_max_recent_purchases(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            email: default_company_email(),
            alert_email: default_alert_email(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            endpoint: String::new(),
            model: String::new(),
            api_key: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for SaleDefaults {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            tax_rate: 0.0,
            payment_status: default_payment_status(),
            fulfillment_status: default_fulfillment_status(),
            channel: default_channel(),
            source: default_source(),
            region: default_region(),
            sales_rep: String::new(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            daily_sales_target: default_daily_sales_target(),
            low_sales_threshold: default_low_sales_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./salesdesk.yaml (current directory)
    /// 3. ~/.config/salesdesk/salesdesk.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "salesdesk.yaml".to_string(),
            shellexpand::tilde("~/.config/salesdesk/salesdesk.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data.dir).to_string())
    }

    pub fn products_file(&self) -> PathBuf {
        self.data_dir().join("products.csv")
    }

    pub fn sales_log_file(&self) -> PathBuf {
        self.data_dir().join("sales_log.csv")
    }

    pub fn interactions_file(&self) -> PathBuf {
        self.data_dir().join("interactions.csv")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir().join("exports")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir().join("backups")
    }

    /// Non-fatal configuration problems, printed at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.llm.provider != "none" && self.llm.provider != "openai_compatible" {
            warnings.push(format!(
                "Unknown llm provider '{}'. Use 'none' or 'openai_compatible'.",
                self.llm.provider
            ));
        }
        if self.llm.max_tokens == 0 {
            warnings.push("llm max_tokens must be greater than 0.".to_string());
        }
        if self.llm.temperature < 0.0 || self.llm.temperature > 1.0 {
            warnings.push("llm temperature should be between 0 and 1.".to_string());
        }
        if self.monitoring.daily_sales_target < 0 {
            warnings.push("daily_sales_target should be 0 or higher.".to_string());
        }
        if self.monitoring.low_sales_threshold < 0 {
            warnings.push("low_sales_threshold should be 0 or higher.".to_string());
        }
        if self.database.busy_timeout_ms == 0 {
            warnings.push("busy_timeout_ms should be greater than 0.".to_string());
        }
        if self.database.max_recent_purchases == 0 {
            warnings.push("max_recent_purchases should be greater than 0.".to_string());
        }
        if self.defaults.tax_rate < 0.0 || self.defaults.tax_rate > 1.0 {
            warnings.push("default tax_rate should be between 0 and 1.".to_string());
        }
        if self.defaults.currency.is_empty() {
            warnings.push("default currency should not be empty.".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.max_recent_purchases, 10);
        assert_eq!(config.llm.provider, "none");
        assert_eq!(config.defaults.currency, "USD");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
database:
  path: /tmp/salesdesk-test/salesdesk.db
  max_recent_purchases: 3

llm:
  provider: openai_compatible
  endpoint: https://api.example.com/v1/chat/completions
  model: gpt-test
  api_key: secret

monitoring:
  daily_sales_target: 20
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.max_recent_purchases, 3);
        assert_eq!(config.llm.provider, "openai_compatible");
        assert_eq!(config.monitoring.daily_sales_target, 20);
        // Untouched sections keep their defaults.
        assert_eq!(config.monitoring.low_sales_threshold, 5);
        assert_eq!(config.defaults.payment_status, "Paid");
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = Config::default();
        config.llm.provider = "mystery".to_string();
        config.llm.temperature = 1.5;
        config.database.max_recent_purchases = 0;
        config.defaults.currency = String::new();

        let warnings = config.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("mystery"));
    }

    #[test]
    fn test_data_paths_derive_from_dir() {
        let mut config = Config::default();
        config.data.dir = "/tmp/desk".to_string();
        assert_eq!(config.products_file(), PathBuf::from("/tmp/desk/products.csv"));
        assert_eq!(config.backups_dir(), PathBuf::from("/tmp/desk/backups"));
    }
}
