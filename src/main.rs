use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use salesdesk::cli::{ask, customers, products, purchases, report, sell, status};
use salesdesk::config::Config;
use salesdesk::data;
use salesdesk::llm;
use salesdesk::store::{CustomerDirectory, LedgerOptions, ProductCatalog, PurchaseLedger};

#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(about = "Point-of-sale ledger and CRM with daily sales analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "salesdesk.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a sale
    Sell(sell::SellArgs),

    /// Purchase history
    Purchases {
        #[command(subcommand)]
        command: PurchaseCommands,
    },

    /// Customer directory
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },

    /// Product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Daily sales report
    Report,

    /// Ask the sales assistant a question
    Ask {
        /// The customer question
        question: String,

        /// Customer name
        #[arg(long, default_value = "Customer")]
        name: String,
    },

    /// Show configuration and assistant status
    Status,
}

#[derive(Subcommand)]
enum PurchaseCommands {
    /// List recent purchases
    List {
        /// Row cap (defaults to the retention maximum)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Search purchases by text and/or trailing days
    Search {
        /// Substring matched against customer, email, product, notes,
        /// invoice id and tags
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only purchases from the last N days
        #[arg(short, long)]
        days: Option<u32>,

        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
    /// Export retained purchases to CSV
    Export {
        /// Destination path (defaults into the exports directory)
        path: Option<PathBuf>,
    },
    /// Back up the purchases database
    Backup {
        /// Destination path (defaults into the backups directory)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List customers, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Search customers by name/email/phone/company/industry/status
    Search {
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Show full customer details
    Show {
        /// Customer ID
        id: i64,
    },
    /// Add or update a customer
    Add(customers::AddArgs),
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products
    List {
        /// Include inactive products
        #[arg(long)]
        all: bool,
    },
    /// Show full product details
    Show {
        /// Product ID
        id: i64,
    },
    /// Add a product
    Add(products::AddArgs),
    /// Edit a product
    Edit(products::EditArgs),
    /// Hide a product from default listings
    Deactivate {
        /// Product ID
        id: i64,
    },
    /// Restore a deactivated product
    Activate {
        /// Product ID
        id: i64,
    },
}

fn ledger_options(config: &Config) -> LedgerOptions {
    LedgerOptions {
        busy_timeout: config.busy_timeout(),
        max_retained: config.database.max_recent_purchases,
        default_currency: config.defaults.currency.clone(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();
    data::ensure_data_files(&config)?;
    info!("salesdesk started");

    let db_path = config.database_path();

    match cli.command {
        Commands::Sell(args) => {
            let catalog =
                ProductCatalog::open(&db_path, config.busy_timeout(), Some(&config.products_file()))?;
            let mut directory = CustomerDirectory::open(&db_path, config.busy_timeout())?;
            let mut ledger = PurchaseLedger::open(&db_path, ledger_options(&config))?;
            sell::run(&catalog, &mut directory, &mut ledger, &config, &args)?;
        }
        Commands::Purchases { command } => {
            let ledger = PurchaseLedger::open(&db_path, ledger_options(&config))?;
            match command {
                PurchaseCommands::List { limit } => purchases::list(&ledger, limit)?,
                PurchaseCommands::Search { query, days, limit } => {
                    purchases::search(&ledger, &query, days, limit)?
                }
                PurchaseCommands::Export { path } => purchases::export(&ledger, &config, path)?,
                PurchaseCommands::Backup { path } => purchases::backup(&ledger, &config, path)?,
            }
        }
        Commands::Customers { command } => {
            let mut directory = CustomerDirectory::open(&db_path, config.busy_timeout())?;
            match command {
                CustomerCommands::List { limit } => customers::list(&directory, limit)?,
                CustomerCommands::Search { query, limit } => {
                    customers::search(&directory, &query, limit)?
                }
                CustomerCommands::Show { id } => customers::show(&directory, id)?,
                CustomerCommands::Add(args) => customers::add(&mut directory, &args)?,
            }
        }
        Commands::Products { command } => {
            let mut catalog =
                ProductCatalog::open(&db_path, config.busy_timeout(), Some(&config.products_file()))?;
            match command {
                ProductCommands::List { all } => products::list(&catalog, !all)?,
                ProductCommands::Show { id } => products::show(&catalog, id)?,
                ProductCommands::Add(args) => products::add(&mut catalog, &args)?,
                ProductCommands::Edit(args) => products::edit(&mut catalog, &args)?,
                ProductCommands::Deactivate { id } => products::set_active(&mut catalog, id, false)?,
                ProductCommands::Activate { id } => products::set_active(&mut catalog, id, true)?,
            }
        }
        Commands::Report => {
            let ledger = PurchaseLedger::open(&db_path, ledger_options(&config))?;
            let client = llm::client_from_config(&config.llm);
            report::run(&ledger, client.as_ref(), &config)?;
        }
        Commands::Ask { question, name } => {
            let catalog =
                ProductCatalog::open(&db_path, config.busy_timeout(), Some(&config.products_file()))?;
            let client = llm::client_from_config(&config.llm);
            ask::run(&catalog, client.as_ref(), &config, &question, &name)?;
        }
        Commands::Status => {
            let client = llm::client_from_config(&config.llm);
            status::run(&config, client.as_ref())?;
        }
    }

    Ok(())
}
