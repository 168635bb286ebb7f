//! Report command implementation

use anyhow::Result;

use crate::config::Config;
use crate::llm::CompletionClient;
use crate::report::build_daily_report;
use crate::store::PurchaseLedger;

use super::pretty_money;

pub fn run(ledger: &PurchaseLedger, client: &dyn CompletionClient, config: &Config) -> Result<()> {
    let report = build_daily_report(ledger, client, config)?;
    let currency = config.defaults.currency.as_str();

    println!("{}", "=".repeat(60));
    println!("DAILY SALES REPORT - {}", report.date);
    println!("{}", "=".repeat(60));
    println!("Sales count: {}", report.summary.count);
    println!("Revenue: {}", pretty_money(report.summary.revenue, currency));
    println!(
        "Average deal: {}",
        pretty_money(report.summary.average, currency)
    );

    println!("\nAlerts:");
    if report.alerts.is_empty() {
        println!("- None");
    } else {
        for alert in &report.alerts {
            println!("- {alert}");
        }
    }

    if !report.top_products.is_empty() {
        println!("\nTop products (7 days):");
        for p in &report.top_products {
            println!(
                "- {} | Orders: {} | Revenue: {}",
                p.product,
                p.count,
                pretty_money(p.revenue, currency)
            );
        }
    }

    if !report.trend.is_empty() {
        println!("\n7-day revenue trend:");
        for point in &report.trend {
            println!("- {}: {}", point.date, pretty_money(point.revenue, currency));
        }
    }

    println!("\nSummary:");
    println!("{}", report.narrative);
    println!("{}", "=".repeat(60));

    Ok(())
}
