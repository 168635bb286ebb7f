//! Purchase history commands: list, search, export, backup

use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;

use crate::config::Config;
use crate::store::{Purchase, PurchaseLedger};

use super::{pretty_money, truncate};

fn print_rows(rows: &[Purchase]) {
    println!(
        "{:<20} {:<18} {:<18} {:>6} {:>12} {:<10} {:<10}",
        "Time", "Customer", "Product", "Qty", "Total", "Status", "Payment"
    );
    println!("{}", "-".repeat(100));
    for row in rows {
        println!(
            "{:<20} {:<18} {:<18} {:>6} {:>12} {:<10} {:<10}",
            row.timestamp,
            truncate(&row.customer, 18),
            truncate(&row.product, 18),
            row.quantity,
            pretty_money(row.total, &row.currency),
            truncate(&row.status, 10),
            truncate(&row.payment_status, 10),
        );
    }
}

pub fn list(ledger: &PurchaseLedger, limit: Option<u32>) -> Result<()> {
    let rows = ledger.recent(limit)?;
    if rows.is_empty() {
        println!("No purchases stored yet.");
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn search(ledger: &PurchaseLedger, query: &str, days: Option<u32>, limit: u32) -> Result<()> {
    let rows = ledger.search(query, days, limit)?;
    if rows.is_empty() {
        println!("No matching purchases.");
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn export(ledger: &PurchaseLedger, config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        config.exports_dir().join(format!("purchases_{stamp}.csv"))
    });

    if ledger.export_csv(&path, None)? {
        println!("Exported to {}", path.display());
    } else {
        println!("No purchases to export.");
    }
    Ok(())
}

pub fn backup(ledger: &PurchaseLedger, config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        config.backups_dir().join(format!("purchases_{stamp}.db"))
    });

    ledger.snapshot(&path)?;
    println!("Backup saved to {}", path.display());
    Ok(())
}
