//! Status command implementation

use anyhow::Result;

use crate::config::Config;
use crate::llm::CompletionClient;

pub fn run(config: &Config, client: &dyn CompletionClient) -> Result<()> {
    println!("salesdesk v{}", env!("CARGO_PKG_VERSION"));
    println!("Database: {}", config.database_path().display());
    println!(
        "Retention: last {} purchases",
        config.database.max_recent_purchases
    );
    println!("{}", client.status_line());

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration: OK");
    } else {
        println!("Configuration warnings:");
        for warning in &warnings {
            println!("- {warning}");
        }
    }

    Ok(())
}
