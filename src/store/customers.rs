//! Customer directory with upsert-by-identity semantics
//!
//! Identity resolution is two-tier: email first when the incoming record
//! has one, otherwise exact name match. The merge itself is a pure
//! function so the "non-empty incoming wins" rule is testable without a
//! database.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

use super::schema::{CUSTOMERS_ADDED_COLUMNS, CUSTOMERS_SCHEMA};
use super::{ensure_columns, now_stamp, open_connection, StoreError};

/// Incoming customer fields. Everything optional except the name; empty
/// strings mean "not supplied" and never overwrite stored values.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub industry: String,
    pub segment: String,
    pub status: String,
    pub lead_source: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub notes: String,
    pub last_contact_at: String,
}

impl CustomerInput {
    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            industry: self.industry.trim().to_string(),
            segment: self.segment.trim().to_string(),
            status: self.status.trim().to_string(),
            lead_source: self.lead_source.trim().to_string(),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.address_line2.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            notes: self.notes.trim().to_string(),
            last_contact_at: self.last_contact_at.trim().to_string(),
        }
    }
}

/// A full customer row.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub industry: String,
    pub segment: String,
    pub status: String,
    pub lead_source: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub notes: String,
    pub last_contact_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The subset of columns shown by list and search views.
#[derive(Debug, Clone)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub industry: String,
    pub status: String,
    pub created_at: String,
}

fn keep_existing(incoming: &str, existing: &str) -> String {
    if incoming.is_empty() {
        existing.to_string()
    } else {
        incoming.to_string()
    }
}

/// Merge an incoming record into an existing row.
///
/// The name always follows the incoming record (it is guaranteed non-empty
/// by the upsert gate); every other field only changes when the incoming
/// value is non-empty.
fn merge(existing: &Customer, incoming: &CustomerInput, updated_at: &str) -> Customer {
    Customer {
        id: existing.id,
        name: incoming.name.clone(),
        email: keep_existing(&incoming.email, &existing.email),
        phone: keep_existing(&incoming.phone, &existing.phone),
        company: keep_existing(&incoming.company, &existing.company),
        industry: keep_existing(&incoming.industry, &existing.industry),
        segment: keep_existing(&incoming.segment, &existing.segment),
        status: keep_existing(&incoming.status, &existing.status),
        lead_source: keep_existing(&incoming.lead_source, &existing.lead_source),
        address_line1: keep_existing(&incoming.address_line1, &existing.address_line1),
        address_line2: keep_existing(&incoming.address_line2, &existing.address_line2),
        city: keep_existing(&incoming.city, &existing.city),
        state: keep_existing(&incoming.state, &existing.state),
        country: keep_existing(&incoming.country, &existing.country),
        postal_code: keep_existing(&incoming.postal_code, &existing.postal_code),
        notes: keep_existing(&incoming.notes, &existing.notes),
        last_contact_at: keep_existing(&incoming.last_contact_at, &existing.last_contact_at),
        created_at: existing.created_at.clone(),
        updated_at: updated_at.to_string(),
    }
}

const CUSTOMER_FIELDS: &str = "id, name, email, phone, company, industry, segment, status, \
     lead_source, address_line1, address_line2, city, state, country, \
     postal_code, notes, last_contact_at, created_at, updated_at";

fn map_customer(row: &rusqlite::Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        company: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        industry: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        segment: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        status: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        lead_source: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        address_line1: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        address_line2: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        city: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        state: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        country: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
        postal_code: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
        notes: row.get::<_, Option<String>>(15)?.unwrap_or_default(),
        last_contact_at: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
        updated_at: row.get::<_, Option<String>>(18)?.unwrap_or_default(),
    })
}

fn map_summary(row: &rusqlite::Row) -> rusqlite::Result<CustomerSummary> {
    Ok(CustomerSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        company: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        industry: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        status: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

fn fetch_customer(conn: &Connection, id: i64) -> Result<Option<Customer>, StoreError> {
    conn.query_row(
        &format!("SELECT {CUSTOMER_FIELDS} FROM customers WHERE id = ?"),
        params![id],
        map_customer,
    )
    .optional()
    .map_err(Into::into)
}

pub struct CustomerDirectory {
    conn: Connection,
}

impl CustomerDirectory {
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, StoreError> {
        let mut conn = open_connection(path, busy_timeout)?;
        conn.execute_batch(CUSTOMERS_SCHEMA)?;
        ensure_columns(&mut conn, "customers", CUSTOMERS_ADDED_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Insert or update a customer, returning its id.
    ///
    /// Returns `Ok(None)` when the name is blank after trimming; the caller
    /// decides whether that deserves a user-facing message. Resolution,
    /// read, merge and write share one transaction.
    pub fn upsert(&mut self, input: &CustomerInput) -> Result<Option<i64>, StoreError> {
        let input = input.trimmed();
        if input.name.is_empty() {
            return Ok(None);
        }

        let now = now_stamp();
        let tx = self.conn.transaction()?;

        let mut existing_id: Option<i64> = None;
        if !input.email.is_empty() {
            existing_id = tx
                .query_row(
                    "SELECT id FROM customers WHERE email = ?",
                    params![input.email],
                    |row| row.get(0),
                )
                .optional()?;
        }
        if existing_id.is_none() {
            existing_id = tx
                .query_row(
                    "SELECT id FROM customers WHERE name = ? LIMIT 1",
                    params![input.name],
                    |row| row.get(0),
                )
                .optional()?;
        }

        let id = match existing_id {
            Some(id) => {
                let existing = fetch_customer(&tx, id)?
                    .ok_or(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;
                let merged = merge(&existing, &input, &now);
                tx.execute(
                    "UPDATE customers
                     SET name = ?, email = ?, phone = ?, company = ?, industry = ?,
                         segment = ?, status = ?, lead_source = ?, address_line1 = ?,
                         address_line2 = ?, city = ?, state = ?, country = ?,
                         postal_code = ?, notes = ?, last_contact_at = ?, updated_at = ?
                     WHERE id = ?",
                    params![
                        merged.name,
                        merged.email,
                        merged.phone,
                        merged.company,
                        merged.industry,
                        merged.segment,
                        merged.status,
                        merged.lead_source,
                        merged.address_line1,
                        merged.address_line2,
                        merged.city,
                        merged.state,
                        merged.country,
                        merged.postal_code,
                        merged.notes,
                        merged.last_contact_at,
                        merged.updated_at,
                        id,
                    ],
                )?;
                id
            }
            None => {
                let last_contact_at = if input.last_contact_at.is_empty() {
                    now.clone()
                } else {
                    input.last_contact_at.clone()
                };
                tx.execute(
                    "INSERT INTO customers (
                        name, email, phone, company, industry, segment, status,
                        lead_source, address_line1, address_line2, city, state,
                        country, postal_code, notes, last_contact_at, created_at, updated_at
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        input.name,
                        input.email,
                        input.phone,
                        input.company,
                        input.industry,
                        input.segment,
                        input.status,
                        input.lead_source,
                        input.address_line1,
                        input.address_line2,
                        input.city,
                        input.state,
                        input.country,
                        input.postal_code,
                        input.notes,
                        last_contact_at,
                        now,
                        now,
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.commit()?;
        Ok(Some(id))
    }

    pub fn get(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        fetch_customer(&self.conn, id)
    }

    /// Most recently created customers first.
    pub fn list(&self, limit: u32) -> Result<Vec<CustomerSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, company, industry, status, created_at
             FROM customers
             ORDER BY id DESC
             LIMIT ?",
        )?;
        let rows = stmt.query_map(params![limit], map_summary)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Substring match over name, email, phone, company, industry and
    /// status, OR-combined, newest first.
    pub fn search(&self, query: &str, limit: u32) -> Result<Vec<CustomerSummary>, StoreError> {
        let like = format!("%{query}%");
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, company, industry, status, created_at
             FROM customers
             WHERE name LIKE ?1 OR email LIKE ?1 OR phone LIKE ?1 OR company LIKE ?1
                   OR industry LIKE ?1 OR status LIKE ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![like, limit], map_summary)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
