//! Sell command implementation
//!
//! Resolves the product, settles the amounts, upserts the customer and
//! records the purchase — the full point-of-sale flow in one shot.

use anyhow::{bail, Result};
use clap::Args;

use crate::config::Config;
use crate::store::purchases::settle_amounts;
use crate::store::{
    now_stamp, CustomerDirectory, CustomerInput, ProductCatalog, PurchaseLedger, SaleDraft,
};

use super::pretty_money;

#[derive(Args)]
pub struct SellArgs {
    /// Product ID (see 'products list')
    #[arg(long)]
    pub product: i64,

    /// Customer name
    #[arg(long, default_value = "Walk-in Customer")]
    pub customer: String,

    /// Customer email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Customer phone
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Customer company
    #[arg(long, default_value = "")]
    pub company: String,

    /// Quantity (defaults to 1)
    #[arg(long)]
    pub quantity: Option<String>,

    /// Unit price (defaults to the product price)
    #[arg(long)]
    pub unit_price: Option<String>,

    /// Discount amount
    #[arg(long)]
    pub discount: Option<String>,

    /// Tax amount (defaults to subtotal times the configured tax rate)
    #[arg(long)]
    pub tax: Option<String>,

    /// Currency code (defaults to the configured currency)
    #[arg(long, default_value = "")]
    pub currency: String,

    /// Payment method (cash/card/upi/other)
    #[arg(long, default_value = "")]
    pub payment_method: String,

    /// Invoice ID
    #[arg(long, default_value = "")]
    pub invoice: String,

    /// Comma separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

pub fn run(
    catalog: &ProductCatalog,
    directory: &mut CustomerDirectory,
    ledger: &mut PurchaseLedger,
    config: &Config,
    args: &SellArgs,
) -> Result<()> {
    let product = match catalog.get(args.product)? {
        Some(product) if product.active => product,
        _ => bail!("Invalid product selection: {}", args.product),
    };

    let unit_price = args
        .unit_price
        .clone()
        .unwrap_or_else(|| product.price.to_string());

    let mut draft = SaleDraft {
        customer: args.customer.clone(),
        customer_email: args.email.clone(),
        product: product.name.clone(),
        quantity: args.quantity.clone().unwrap_or_default(),
        unit_price: Some(unit_price),
        discount: args.discount.clone().unwrap_or_default(),
        currency: args.currency.clone(),
        status: "Completed".to_string(),
        payment_status: config.defaults.payment_status.clone(),
        fulfillment_status: config.defaults.fulfillment_status.clone(),
        payment_method: args.payment_method.clone(),
        channel: config.defaults.channel.clone(),
        source: config.defaults.source.clone(),
        region: config.defaults.region.clone(),
        sales_rep: config.defaults.sales_rep.clone(),
        invoice_id: args.invoice.clone(),
        tags: args.tags.clone(),
        notes: args.notes.clone(),
        ..SaleDraft::default()
    };

    // Default the tax from the configured rate once the subtotal is known.
    match &args.tax {
        Some(tax) => draft.tax = tax.clone(),
        None => {
            let provisional = settle_amounts(&draft);
            if config.defaults.tax_rate > 0.0 {
                draft.tax = (provisional.subtotal * config.defaults.tax_rate).to_string();
            }
        }
    }

    let amounts = settle_amounts(&draft);
    draft.amount = amounts.total.to_string();

    directory.upsert(&CustomerInput {
        name: args.customer.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        company: args.company.clone(),
        last_contact_at: now_stamp(),
        ..CustomerInput::default()
    })?;

    ledger.record(&draft)?;

    let currency = if args.currency.is_empty() {
        config.defaults.currency.as_str()
    } else {
        args.currency.as_str()
    };
    println!("Sale recorded.");
    println!("- Product: {}", product.name);
    println!("- Quantity: {}", amounts.quantity);
    println!("- Unit price: {}", pretty_money(amounts.unit_price, currency));
    println!("- Subtotal: {}", pretty_money(amounts.subtotal, currency));
    println!("- Discount: {}", pretty_money(amounts.discount, currency));
    println!("- Tax: {}", pretty_money(amounts.tax, currency));
    println!("- Total: {}", pretty_money(amounts.total, currency));

    Ok(())
}
