//! Data directory bootstrap and the append-only interaction log
//!
//! Creates the data folders and sample seed files on startup when they are
//! missing. Existing files are never touched.

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::error;

use crate::config::Config;

const INTERACTION_HEADER: &[&str] = &["timestamp", "customer", "question", "response", "status"];

const SAMPLE_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    (
        "CRM Pro",
        "99",
        "Contact management, email tracking, basic reporting",
        "Small teams",
    ),
    (
        "Analytics Suite",
        "149",
        "Dashboards, predictive insights, custom reports",
        "Data teams",
    ),
    (
        "Marketing Tool",
        "79",
        "Email campaigns, social scheduling, A/B testing",
        "Marketing teams",
    ),
];

/// Create folders and sample CSV files if missing.
pub fn ensure_data_files(config: &Config) -> Result<()> {
    std::fs::create_dir_all(config.data_dir())?;
    std::fs::create_dir_all(config.exports_dir())?;
    std::fs::create_dir_all(config.backups_dir())?;

    let products = config.products_file();
    if !products.exists() {
        write_sample_products(&products)?;
    }

    let sales_log = config.sales_log_file();
    if !sales_log.exists() {
        write_sample_sales_log(&sales_log)?;
    }

    let interactions = config.interactions_file();
    if !interactions.exists() {
        let mut writer = csv::Writer::from_path(&interactions)?;
        writer.write_record(INTERACTION_HEADER)?;
        writer.flush()?;
    }

    Ok(())
}

fn write_sample_products(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["name", "price", "features", "best_for"])?;
    for (name, price, features, best_for) in SAMPLE_PRODUCTS {
        writer.write_record([*name, *price, *features, *best_for])?;
    }
    writer.flush()?;
    Ok(())
}

/// Seven days of sample sales, newest first, cycling the sample products.
fn write_sample_sales_log(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "product", "amount", "customer", "status"])?;
    let today = Local::now().date_naive();
    for i in 0..7 {
        let (name, price, _, _) = SAMPLE_PRODUCTS[i % SAMPLE_PRODUCTS.len()];
        let date = today - chrono::Duration::days(i as i64);
        writer.write_record([
            date.format("%Y-%m-%d").to_string(),
            name.to_string(),
            price.to_string(),
            format!("Sample Customer {}", i + 1),
            "Completed".to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One handled inquiry, appended to the interaction log.
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub customer: String,
    pub question: String,
    pub response: String,
    pub status: String,
}

/// Append one row to the interaction log. Failures are logged and
/// swallowed; the log never interrupts an inquiry.
pub fn append_interaction(config: &Config, record: &InteractionRecord) {
    if let Err(err) = try_append_interaction(config, record) {
        error!("failed to write interaction: {err}");
    }
}

fn try_append_interaction(config: &Config, record: &InteractionRecord) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.interactions_file())?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record([
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        record.customer.clone(),
        record.question.clone(),
        record.response.clone(),
        record.status.clone(),
    ])?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.data.dir = dir.path().join("data").to_string_lossy().to_string();
        config
    }

    #[test]
    fn bootstrap_creates_seed_files_once() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        ensure_data_files(&config).unwrap();

        assert!(config.products_file().exists());
        assert!(config.sales_log_file().exists());
        assert!(config.interactions_file().exists());
        assert!(config.exports_dir().is_dir());
        assert!(config.backups_dir().is_dir());

        let mut reader = csv::Reader::from_path(config.products_file()).unwrap();
        assert_eq!(reader.records().count(), 3);

        let mut reader = csv::Reader::from_path(config.sales_log_file()).unwrap();
        assert_eq!(reader.records().count(), 7);

        // A second run leaves existing files alone.
        std::fs::write(config.products_file(), "name,price,features,best_for\n").unwrap();
        ensure_data_files(&config).unwrap();
        let content = std::fs::read_to_string(config.products_file()).unwrap();
        assert_eq!(content, "name,price,features,best_for\n");
    }

    #[test]
    fn interactions_append_without_rewriting_header() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        ensure_data_files(&config).unwrap();

        let record = InteractionRecord {
            customer: "Ada".to_string(),
            question: "What does CRM Pro cost?".to_string(),
            response: "CRM Pro is $99.".to_string(),
            status: "Completed".to_string(),
        };
        append_interaction(&config, &record);
        append_interaction(&config, &record);

        let mut reader = csv::Reader::from_path(config.interactions_file()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Ada");
        assert_eq!(&rows[0][4], "Completed");
    }
}
