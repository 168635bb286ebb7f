//! Product catalog commands: list, show, add, edit, activate/deactivate

use anyhow::Result;
use clap::Args;

use crate::store::{Product, ProductCatalog, ProductInput, ProductPatch};

use super::{pretty_money, truncate};

#[derive(Args)]
pub struct AddArgs {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Price
    #[arg(long, default_value = "0")]
    pub price: String,

    #[arg(long, default_value = "")]
    pub sku: String,

    #[arg(long, default_value = "")]
    pub category: String,

    #[arg(long, default_value = "0")]
    pub cost: String,

    /// Tax rate between 0 and 1
    #[arg(long, default_value = "0")]
    pub tax_rate: String,

    /// Unit, e.g. license/seat
    #[arg(long, default_value = "")]
    pub unit: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub features: String,

    #[arg(long, default_value = "")]
    pub best_for: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Product ID
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub cost: Option<f64>,

    #[arg(long)]
    pub tax_rate: Option<f64>,

    #[arg(long)]
    pub unit: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub features: Option<String>,

    #[arg(long)]
    pub best_for: Option<String>,
}

fn print_rows(rows: &[Product]) {
    println!(
        "{:<6} {:<22} {:<10} {:<12} {:>12} {:<6}",
        "ID", "Name", "SKU", "Category", "Price", "Active"
    );
    println!("{}", "-".repeat(74));
    for row in rows {
        println!(
            "{:<6} {:<22} {:<10} {:<12} {:>12} {:<6}",
            row.id,
            truncate(&row.name, 22),
            truncate(&row.sku, 10),
            truncate(&row.category, 12),
            pretty_money(row.price, ""),
            if row.active { "Yes" } else { "No" },
        );
    }
}

pub fn list(catalog: &ProductCatalog, active_only: bool) -> Result<()> {
    let rows = catalog.list(active_only)?;
    if rows.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn show(catalog: &ProductCatalog, id: i64) -> Result<()> {
    let product = match catalog.get(id)? {
        Some(product) => product,
        None => {
            println!("Product not found.");
            return Ok(());
        }
    };

    println!("Product Details");
    println!("- Name: {}", product.name);
    println!("- SKU: {}", product.sku);
    println!("- Category: {}", product.category);
    println!("- Price: {}", pretty_money(product.price, ""));
    println!("- Cost: {}", pretty_money(product.cost, ""));
    println!("- Tax rate: {}", product.tax_rate);
    println!("- Unit: {}", product.unit);
    println!("- Description: {}", product.description);
    println!("- Features: {}", product.features);
    println!("- Best for: {}", product.best_for);
    println!("- Active: {}", if product.active { "Yes" } else { "No" });
    Ok(())
}

pub fn add(catalog: &mut ProductCatalog, args: &AddArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        println!("Name is required.");
        return Ok(());
    }

    catalog.add(&ProductInput {
        name: args.name.clone(),
        sku: args.sku.clone(),
        category: args.category.clone(),
        price: args.price.clone(),
        cost: args.cost.clone(),
        tax_rate: args.tax_rate.clone(),
        unit: args.unit.clone(),
        description: args.description.clone(),
        features: args.features.clone(),
        best_for: args.best_for.clone(),
    })?;
    println!("Product added.");
    Ok(())
}

pub fn edit(catalog: &mut ProductCatalog, args: &EditArgs) -> Result<()> {
    if catalog.get(args.id)?.is_none() {
        println!("Product not found.");
        return Ok(());
    }

    let patch = ProductPatch {
        name: args.name.clone(),
        sku: args.sku.clone(),
        category: args.category.clone(),
        price: args.price,
        cost: args.cost,
        tax_rate: args.tax_rate,
        unit: args.unit.clone(),
        description: args.description.clone(),
        features: args.features.clone(),
        best_for: args.best_for.clone(),
        active: None,
    };

    if catalog.update(args.id, &patch)? {
        println!("Product updated.");
    } else {
        println!("No changes made.");
    }
    Ok(())
}

pub fn set_active(catalog: &mut ProductCatalog, id: i64, active: bool) -> Result<()> {
    if catalog.get(id)?.is_none() {
        println!("Product not found.");
        return Ok(());
    }

    if active {
        catalog.activate(id)?;
        println!("Product activated.");
    } else {
        catalog.deactivate(id)?;
        println!("Product deactivated.");
    }
    Ok(())
}
