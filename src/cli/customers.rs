//! Customer directory commands: list, search, show, add

use anyhow::Result;
use clap::Args;

use crate::store::{now_stamp, CustomerDirectory, CustomerInput, CustomerSummary};

use super::truncate;

#[derive(Args)]
pub struct AddArgs {
    /// Customer name (required, must be non-blank)
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub company: String,

    #[arg(long, default_value = "")]
    pub industry: String,

    #[arg(long, default_value = "")]
    pub segment: String,

    /// Lead/Active/Inactive
    #[arg(long, default_value = "")]
    pub status: String,

    #[arg(long, default_value = "")]
    pub lead_source: String,

    #[arg(long, default_value = "")]
    pub address_line1: String,

    #[arg(long, default_value = "")]
    pub address_line2: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub state: String,

    #[arg(long, default_value = "")]
    pub country: String,

    #[arg(long, default_value = "")]
    pub postal_code: String,

    #[arg(long, default_value = "")]
    pub notes: String,
}

fn print_rows(rows: &[CustomerSummary]) {
    println!(
        "{:<6} {:<20} {:<24} {:<14} {:<18} {:<10}",
        "ID", "Name", "Email", "Phone", "Company", "Status"
    );
    println!("{}", "-".repeat(96));
    for row in rows {
        println!(
            "{:<6} {:<20} {:<24} {:<14} {:<18} {:<10}",
            row.id,
            truncate(&row.name, 20),
            truncate(&row.email, 24),
            truncate(&row.phone, 14),
            truncate(&row.company, 18),
            truncate(&row.status, 10),
        );
    }
}

pub fn list(directory: &CustomerDirectory, limit: u32) -> Result<()> {
    let rows = directory.list(limit)?;
    if rows.is_empty() {
        println!("No customers found.");
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn search(directory: &CustomerDirectory, query: &str, limit: u32) -> Result<()> {
    let rows = directory.search(query, limit)?;
    if rows.is_empty() {
        println!("No matching customers.");
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn show(directory: &CustomerDirectory, id: i64) -> Result<()> {
    let customer = match directory.get(id)? {
        Some(customer) => customer,
        None => {
            println!("Customer not found.");
            return Ok(());
        }
    };

    println!("Customer Details");
    println!("- Name: {}", customer.name);
    println!("- Email: {}", customer.email);
    println!("- Phone: {}", customer.phone);
    println!("- Company: {}", customer.company);
    println!("- Industry: {}", customer.industry);
    println!("- Segment: {}", customer.segment);
    println!("- Status: {}", customer.status);
    println!("- Lead Source: {}", customer.lead_source);
    println!("- Address: {}", customer.address_line1);
    println!("- Address 2: {}", customer.address_line2);
    println!("- City: {}", customer.city);
    println!("- State: {}", customer.state);
    println!("- Country: {}", customer.country);
    println!("- Postal Code: {}", customer.postal_code);
    println!("- Last Contact: {}", customer.last_contact_at);
    println!("- Created: {}", customer.created_at);
    println!("- Updated: {}", customer.updated_at);
    println!("- Notes: {}", customer.notes);
    Ok(())
}

pub fn add(directory: &mut CustomerDirectory, args: &AddArgs) -> Result<()> {
    let input = CustomerInput {
        name: args.name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        company: args.company.clone(),
        industry: args.industry.clone(),
        segment: args.segment.clone(),
        status: args.status.clone(),
        lead_source: args.lead_source.clone(),
        address_line1: args.address_line1.clone(),
        address_line2: args.address_line2.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        country: args.country.clone(),
        postal_code: args.postal_code.clone(),
        notes: args.notes.clone(),
        last_contact_at: now_stamp(),
    };

    match directory.upsert(&input)? {
        Some(id) => println!("Customer saved with ID: {id}"),
        None => println!("Name is required."),
    }
    Ok(())
}
