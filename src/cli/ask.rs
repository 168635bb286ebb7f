//! Ask command implementation

use anyhow::Result;

use crate::agent::SalesAgent;
use crate::config::Config;
use crate::llm::CompletionClient;
use crate::store::ProductCatalog;

pub fn run(
    catalog: &ProductCatalog,
    client: &dyn CompletionClient,
    config: &Config,
    question: &str,
    customer_name: &str,
) -> Result<()> {
    let products = catalog.list(true)?;
    let agent = SalesAgent::new(products, client, config);
    let response = agent.handle_inquiry(question, customer_name);
    println!("{response}");
    Ok(())
}
