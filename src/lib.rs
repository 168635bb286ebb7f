pub mod agent;
pub mod cli;
pub mod config;
pub mod data;
pub mod llm;
pub mod report;
pub mod store;

pub use config::Config;
pub use store::{CustomerDirectory, ProductCatalog, PurchaseLedger};
