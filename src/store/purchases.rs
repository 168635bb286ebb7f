//! Purchase ledger with bounded retention
//!
//! Append-only apart from eviction: every insert trims the table back to the
//! most recent `max_retained` rows by id, in the same transaction, so a
//! concurrent reader never observes more rows than the cap or a
//! half-evicted state. Rows are immutable once written.

use rusqlite::backup::Backup;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::time::Duration;

use super::schema::{PURCHASES_ADDED_COLUMNS, PURCHASES_SCHEMA};
use super::{ensure_columns, now_stamp, open_connection, StoreError};

/// Tuning knobs for the ledger, resolved from configuration by the caller.
#[derive(Debug, Clone)]
pub struct LedgerOptions {
    pub busy_timeout: Duration,
    pub max_retained: u32,
    pub default_currency: String,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(5000),
            max_retained: 10,
            default_currency: "USD".to_string(),
        }
    }
}

/// Incoming sale as captured at the point of sale.
///
/// Numeric fields arrive as raw text; anything unparsable is coerced to a
/// safe value instead of rejecting the sale. `unit_price` and `total` are
/// `None` when not supplied so "omitted" and "garbage" stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct SaleDraft {
    pub customer: String,
    pub customer_email: String,
    pub product: String,
    pub amount: String,
    pub status: String,
    pub quantity: String,
    pub unit_price: Option<String>,
    pub discount: String,
    pub tax: String,
    pub total: Option<String>,
    pub currency: String,
    pub payment_status: String,
    pub fulfillment_status: String,
    pub payment_method: String,
    pub channel: String,
    pub source: String,
    pub region: String,
    pub sales_rep: String,
    pub invoice_id: String,
    pub tags: String,
    pub notes: String,
}

/// Settled monetary fields for one sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleAmounts {
    pub amount: f64,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Coerce and settle the monetary fields of a draft.
///
/// Invalid or non-positive quantity falls back to 1. A missing unit price
/// falls back to the supplied amount. Subtotal is clamped at zero; discount
/// and tax are clamped at zero when applied to the total; an explicit
/// negative total is clamped to zero.
pub fn settle_amounts(draft: &SaleDraft) -> SaleAmounts {
    let mut quantity = if draft.quantity.trim().is_empty() {
        1.0
    } else {
        parse_number(&draft.quantity).unwrap_or(1.0)
    };
    if quantity <= 0.0 {
        quantity = 1.0;
    }

    let amount = parse_number(&draft.amount).unwrap_or(0.0);

    let unit_price = match &draft.unit_price {
        None => amount,
        Some(raw) => parse_number(raw).unwrap_or(0.0),
    };

    let discount = parse_number(&draft.discount).unwrap_or(0.0);
    let tax = parse_number(&draft.tax).unwrap_or(0.0);

    let subtotal = (quantity * unit_price).max(0.0);
    let computed_total = subtotal - discount.max(0.0) + tax.max(0.0);

    let mut total = match &draft.total {
        None => computed_total,
        Some(raw) => parse_number(raw).unwrap_or(computed_total),
    };
    if total < 0.0 {
        total = 0.0;
    }

    SaleAmounts {
        amount,
        quantity,
        unit_price,
        subtotal,
        discount,
        tax,
        total,
    }
}

/// A retained purchase row.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub timestamp: String,
    pub customer: String,
    pub customer_email: String,
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    pub fulfillment_status: String,
    pub payment_method: String,
    pub channel: String,
    pub source: String,
    pub region: String,
    pub sales_rep: String,
    pub invoice_id: String,
    pub tags: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub count: i64,
    pub revenue: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRollup {
    pub product: String,
    pub count: i64,
    pub revenue: f64,
}

const PURCHASE_FIELDS: &str = "timestamp, customer, customer_email, product, \
     quantity, unit_price, subtotal, discount, tax, total, currency, \
     status, payment_status, fulfillment_status, payment_method, channel, \
     source, region, sales_rep, invoice_id, tags, notes";

/// CSV header for exports, in the same order as [`PURCHASE_FIELDS`].
const EXPORT_HEADER: &[&str] = &[
    "timestamp",
    "customer",
    "customer_email",
    "product",
    "quantity",
    "unit_price",
    "subtotal",
    "discount",
    "tax",
    "total",
    "currency",
    "status",
    "payment_status",
    "fulfillment_status",
    "payment_method",
    "channel",
    "source",
    "region",
    "sales_rep",
    "invoice_id",
    "tags",
    "notes",
];

fn map_purchase(row: &rusqlite::Row) -> rusqlite::Result<Purchase> {
    Ok(Purchase {
        timestamp: row.get(0)?,
        customer: row.get(1)?,
        customer_email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        product: row.get(3)?,
        quantity: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
        unit_price: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
        subtotal: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
        discount: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
        tax: row.get::<_, Option<f64>>(8)?.unwrap_or_default(),
        total: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
        currency: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        status: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        payment_status: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        fulfillment_status: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
        payment_method: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
        channel: row.get::<_, Option<String>>(15)?.unwrap_or_default(),
        source: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
        region: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
        sales_rep: row.get::<_, Option<String>>(18)?.unwrap_or_default(),
        invoice_id: row.get::<_, Option<String>>(19)?.unwrap_or_default(),
        tags: row.get::<_, Option<String>>(20)?.unwrap_or_default(),
        notes: row.get::<_, Option<String>>(21)?.unwrap_or_default(),
    })
}

pub struct PurchaseLedger {
    conn: Connection,
    max_retained: u32,
    default_currency: String,
}

impl PurchaseLedger {
    pub fn open(path: &Path, options: LedgerOptions) -> Result<Self, StoreError> {
        let mut conn = open_connection(path, options.busy_timeout)?;
        conn.execute_batch(PURCHASES_SCHEMA)?;
        ensure_columns(&mut conn, "purchases", PURCHASES_ADDED_COLUMNS)?;
        Ok(Self {
            conn,
            max_retained: options.max_retained,
            default_currency: options.default_currency,
        })
    }

    /// Record one confirmed sale and evict rows past the retention cap.
    ///
    /// Insert and eviction share one transaction. Eviction ranks by id, so
    /// a backdated timestamp does not protect a row.
    pub fn record(&mut self, draft: &SaleDraft) -> Result<(), StoreError> {
        self.record_stamped(draft, &now_stamp())
    }

    fn record_stamped(&mut self, draft: &SaleDraft, timestamp: &str) -> Result<(), StoreError> {
        let amounts = settle_amounts(draft);
        let currency = if draft.currency.trim().is_empty() {
            self.default_currency.as_str()
        } else {
            draft.currency.trim()
        };
        let status = if draft.status.is_empty() {
            "Completed"
        } else {
            draft.status.as_str()
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO purchases (
                timestamp, customer, customer_email, product, amount,
                quantity, unit_price, subtotal, discount, tax, total, currency,
                status, payment_status, fulfillment_status, payment_method,
                channel, source, region, sales_rep, invoice_id, tags, notes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                timestamp,
                draft.customer,
                draft.customer_email,
                draft.product,
                amounts.total,
                amounts.quantity,
                amounts.unit_price,
                amounts.subtotal,
                amounts.discount,
                amounts.tax,
                amounts.total,
                currency,
                status,
                draft.payment_status,
                draft.fulfillment_status,
                draft.payment_method,
                draft.channel,
                draft.source,
                draft.region,
                draft.sales_rep,
                draft.invoice_id,
                draft.tags,
                draft.notes,
            ],
        )?;
        tx.execute(
            "DELETE FROM purchases
             WHERE id NOT IN (
                 SELECT id FROM purchases ORDER BY id DESC LIMIT ?
             )",
            params![self.max_retained],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Most recent purchases, newest first. `None` means the retention cap.
    pub fn recent(&self, limit: Option<u32>) -> Result<Vec<Purchase>, StoreError> {
        let limit = limit.unwrap_or(self.max_retained);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PURCHASE_FIELDS} FROM purchases ORDER BY id DESC LIMIT ?"
        ))?;
        let rows = stmt.query_map(params![limit], map_purchase)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Substring search across customer, email, product, notes, invoice id
    /// and tags (OR), optionally limited to the trailing `days` window (AND).
    ///
    /// Matching follows SQLite's LIKE: case-insensitive for ASCII.
    pub fn search(
        &self,
        query: &str,
        days: Option<u32>,
        limit: u32,
    ) -> Result<Vec<Purchase>, StoreError> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut bindings: Vec<Box<dyn ToSql>> = Vec::new();

        if !query.is_empty() {
            clauses.push(
                "(customer LIKE ? OR customer_email LIKE ? OR product LIKE ? \
                 OR notes LIKE ? OR invoice_id LIKE ? OR tags LIKE ?)",
            );
            let like = format!("%{query}%");
            for _ in 0..6 {
                bindings.push(Box::new(like.clone()));
            }
        }

        if let Some(days) = days {
            if days > 0 {
                let cutoff = chrono::Local::now() - chrono::Duration::days(days as i64);
                clauses.push("timestamp >= ?");
                bindings.push(Box::new(cutoff.format("%Y-%m-%d %H:%M:%S").to_string()));
            }
        }

        let mut sql = format!("SELECT {PURCHASE_FIELDS} FROM purchases");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id DESC LIMIT ?");
        bindings.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings.iter().map(|b| b.as_ref())), map_purchase)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count, revenue and average deal for purchases dated `date_label`.
    ///
    /// Revenue falls back to the amount column when total is null; an empty
    /// day yields zeros rather than a division error.
    pub fn daily_summary(&self, date_label: &str) -> Result<DailySummary, StoreError> {
        self.conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(COALESCE(total, amount, 0)), 0),
                        COALESCE(AVG(COALESCE(total, amount, 0)), 0)
                 FROM purchases
                 WHERE date(timestamp) = ?",
                params![date_label],
                |row| {
                    Ok(DailySummary {
                        count: row.get(0)?,
                        revenue: row.get(1)?,
                        average: row.get(2)?,
                    })
                },
            )
            .map_err(Into::into)
    }

    /// Revenue per day over the trailing `days` calendar days including
    /// today. Days without purchases are omitted, not zero-filled.
    pub fn trend(&self, days: u32) -> Result<Vec<TrendPoint>, StoreError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let since = (chrono::Local::now() - chrono::Duration::days(days as i64 - 1))
            .format("%Y-%m-%d")
            .to_string();
        let mut stmt = self.conn.prepare(
            "SELECT date(timestamp), SUM(COALESCE(total, amount, 0))
             FROM purchases
             WHERE date(timestamp) >= ?
             GROUP BY date(timestamp)
             ORDER BY date(timestamp)",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok(TrendPoint {
                date: row.get(0)?,
                revenue: row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Best-selling products by revenue over the trailing `days` days.
    pub fn top_products(&self, days: u32, limit: u32) -> Result<Vec<ProductRollup>, StoreError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let since = (chrono::Local::now() - chrono::Duration::days(days as i64 - 1))
            .format("%Y-%m-%d")
            .to_string();
        let mut stmt = self.conn.prepare(
            "SELECT product, COUNT(*), SUM(COALESCE(total, amount, 0))
             FROM purchases
             WHERE date(timestamp) >= ?
             GROUP BY product
             ORDER BY SUM(COALESCE(total, amount, 0)) DESC
             LIMIT ?",
        )?;
        let rows = stmt.query_map(params![since, limit], |row| {
            Ok(ProductRollup {
                product: row.get(0)?,
                count: row.get(1)?,
                revenue: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Write all retained purchases to `path` as CSV.
    ///
    /// Returns false without creating a file when the ledger is empty.
    pub fn export_csv(&self, path: &Path, limit: Option<u32>) -> Result<bool, StoreError> {
        let rows = self.recent(limit)?;
        if rows.is_empty() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(EXPORT_HEADER)?;
        for p in &rows {
            writer.write_record(&[
                p.timestamp.clone(),
                p.customer.clone(),
                p.customer_email.clone(),
                p.product.clone(),
                p.quantity.to_string(),
                p.unit_price.to_string(),
                p.subtotal.to_string(),
                p.discount.to_string(),
                p.tax.to_string(),
                p.total.to_string(),
                p.currency.clone(),
                p.status.clone(),
                p.payment_status.clone(),
                p.fulfillment_status.clone(),
                p.payment_method.clone(),
                p.channel.clone(),
                p.source.clone(),
                p.region.clone(),
                p.sales_rep.clone(),
                p.invoice_id.clone(),
                p.tags.clone(),
                p.notes.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(true)
    }

    /// Point-in-time copy of the database file via the SQLite backup API.
    ///
    /// A plain filesystem copy of a live WAL database can tear; the backup
    /// API snapshots a consistent state even with a writer active.
    pub fn snapshot(&self, dest: &Path) -> Result<(), StoreError> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut dst = Connection::open(dest)?;
        let backup = Backup::new(&self.conn, &mut dst)?;
        backup.run_to_completion(100, Duration::from_millis(250), None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger(max_retained: u32) -> (TempDir, PurchaseLedger) {
        let dir = TempDir::new().unwrap();
        let options = LedgerOptions {
            max_retained,
            ..LedgerOptions::default()
        };
        let ledger = PurchaseLedger::open(&dir.path().join("purchases.db"), options).unwrap();
        (dir, ledger)
    }

    fn draft(customer: &str, product: &str, amount: &str) -> SaleDraft {
        SaleDraft {
            customer: customer.to_string(),
            product: product.to_string(),
            amount: amount.to_string(),
            ..SaleDraft::default()
        }
    }

    #[test]
    fn quantity_coercion_falls_back_to_one() {
        for bad in ["0", "-3", "not a number"] {
            let mut d = draft("Ada", "CRM Pro", "99");
            d.quantity = bad.to_string();
            assert_eq!(settle_amounts(&d).quantity, 1.0, "quantity {bad:?}");
        }
    }

    #[test]
    fn omitted_unit_price_falls_back_to_amount() {
        let d = draft("Ada", "CRM Pro", "149");
        let amounts = settle_amounts(&d);
        assert_eq!(amounts.unit_price, 149.0);
        assert_eq!(amounts.subtotal, 149.0);
    }

    #[test]
    fn total_is_subtotal_minus_discount_plus_tax() {
        let mut d = draft("Ada", "CRM Pro", "100");
        d.quantity = "2".to_string();
        d.unit_price = Some("50".to_string());
        d.discount = "10".to_string();
        d.tax = "5".to_string();
        let amounts = settle_amounts(&d);
        assert_eq!(amounts.subtotal, 100.0);
        assert_eq!(amounts.total, 95.0);
    }

    #[test]
    fn explicit_negative_total_clamps_to_zero() {
        let mut d = draft("Ada", "CRM Pro", "100");
        d.total = Some("-20".to_string());
        assert_eq!(settle_amounts(&d).total, 0.0);
    }

    #[test]
    fn negative_discount_is_ignored_in_total() {
        let mut d = draft("Ada", "CRM Pro", "100");
        d.discount = "-50".to_string();
        let amounts = settle_amounts(&d);
        assert_eq!(amounts.discount, -50.0);
        assert_eq!(amounts.total, 100.0);
    }

    #[test]
    fn retention_keeps_most_recent_three() {
        let (_dir, mut ledger) = ledger(3);
        for name in ["A", "B", "C", "D", "E"] {
            ledger.record(&draft(name, "CRM Pro", "99")).unwrap();
        }
        let rows = ledger.recent(Some(10)).unwrap();
        let customers: Vec<&str> = rows.iter().map(|p| p.customer.as_str()).collect();
        assert_eq!(customers, vec!["E", "D", "C"]);
    }

    #[test]
    fn eviction_ranks_by_insertion_order_not_timestamp() {
        let (_dir, mut ledger) = ledger(2);
        // The oldest insertion carries the newest timestamp; it still goes.
        ledger
            .record_stamped(&draft("first", "CRM Pro", "99"), "2099-01-01 00:00:00")
            .unwrap();
        ledger
            .record_stamped(&draft("second", "CRM Pro", "99"), "2000-01-01 00:00:00")
            .unwrap();
        ledger
            .record_stamped(&draft("third", "CRM Pro", "99"), "2000-01-02 00:00:00")
            .unwrap();
        let customers: Vec<String> = ledger
            .recent(None)
            .unwrap()
            .into_iter()
            .map(|p| p.customer)
            .collect();
        assert_eq!(customers, vec!["third", "second"]);
    }

    #[test]
    fn recent_never_exceeds_retention_after_each_insert() {
        let (_dir, mut ledger) = ledger(4);
        for i in 0..12 {
            ledger
                .record(&draft(&format!("c{i}"), "CRM Pro", "10"))
                .unwrap();
            assert!(ledger.recent(Some(100)).unwrap().len() <= 4);
        }
    }

    #[test]
    fn daily_summary_for_empty_day_is_all_zeros() {
        let (_dir, ledger) = ledger(10);
        let summary = ledger.daily_summary("1999-12-31").unwrap();
        assert_eq!(
            summary,
            DailySummary {
                count: 0,
                revenue: 0.0,
                average: 0.0
            }
        );
    }

    #[test]
    fn daily_summary_counts_todays_purchases() {
        let (_dir, mut ledger) = ledger(10);
        ledger.record(&draft("Ada", "CRM Pro", "100")).unwrap();
        ledger.record(&draft("Grace", "CRM Pro", "50")).unwrap();
        let summary = ledger.daily_summary(&crate::store::today_label()).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.revenue, 150.0);
        assert_eq!(summary.average, 75.0);
    }

    #[test]
    fn trend_omits_days_without_purchases() {
        // Days with no purchases are left out rather than zero-filled.
        let (_dir, mut ledger) = ledger(10);
        let today = chrono::Local::now();
        let two_days_ago = today - chrono::Duration::days(2);
        ledger
            .record_stamped(
                &draft("Ada", "CRM Pro", "100"),
                &today.format("%Y-%m-%d 10:00:00").to_string(),
            )
            .unwrap();
        ledger
            .record_stamped(
                &draft("Grace", "CRM Pro", "50"),
                &two_days_ago.format("%Y-%m-%d 10:00:00").to_string(),
            )
            .unwrap();
        let trend = ledger.trend(7).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].revenue, 50.0);
        assert_eq!(trend[1].revenue, 100.0);
    }

    #[test]
    fn top_products_orders_by_revenue_desc() {
        let (_dir, mut ledger) = ledger(10);
        ledger.record(&draft("Ada", "CRM Pro", "100")).unwrap();
        ledger.record(&draft("Ada", "CRM Pro", "100")).unwrap();
        ledger
            .record(&draft("Grace", "Analytics Suite", "500"))
            .unwrap();
        let top = ledger.top_products(7, 3).unwrap();
        assert_eq!(top[0].product, "Analytics Suite");
        assert_eq!(top[0].revenue, 500.0);
        assert_eq!(top[1].product, "CRM Pro");
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn search_matches_case_insensitively() {
        let (_dir, mut ledger) = ledger(10);
        ledger.record(&draft("Ada Lovelace", "CRM Pro", "99")).unwrap();
        let hits = ledger.search("lovelace", None, 20).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer, "Ada Lovelace");
    }

    #[test]
    fn search_combines_text_and_day_filters() {
        let (_dir, mut ledger) = ledger(10);
        ledger
            .record_stamped(&draft("Ada", "CRM Pro", "99"), "2020-01-01 09:00:00")
            .unwrap();
        ledger.record(&draft("Ada", "CRM Pro", "99")).unwrap();
        let hits = ledger.search("Ada", Some(7), 20).unwrap();
        assert_eq!(hits.len(), 1);
        assert_ne!(hits[0].timestamp, "2020-01-01 09:00:00");
    }

    #[test]
    fn search_spans_notes_and_invoice_and_tags() {
        let (_dir, mut ledger) = ledger(10);
        let mut d = draft("Ada", "CRM Pro", "99");
        d.invoice_id = "INV-7781".to_string();
        d.tags = "priority,renewal".to_string();
        ledger.record(&d).unwrap();
        assert_eq!(ledger.search("INV-7781", None, 20).unwrap().len(), 1);
        assert_eq!(ledger.search("renewal", None, 20).unwrap().len(), 1);
        assert!(ledger.search("no-such-text", None, 20).unwrap().is_empty());
    }

    #[test]
    fn export_round_trips_field_values() {
        let (dir, mut ledger) = ledger(10);
        let mut d = draft("Ada", "CRM Pro", "99.5");
        d.customer_email = "ada@example.com".to_string();
        d.quantity = "2".to_string();
        d.unit_price = Some("49.75".to_string());
        d.notes = "rush order".to_string();
        ledger.record(&d).unwrap();
        ledger.record(&draft("Grace", "Analytics Suite", "149")).unwrap();

        let path = dir.path().join("export.csv");
        assert!(ledger.export_csv(&path, None).unwrap());

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first, matching recent().
        assert_eq!(&rows[0][1], "Grace");
        assert_eq!(&rows[1][1], "Ada");
        assert_eq!(&rows[1][2], "ada@example.com");
        assert_eq!(rows[1][4].parse::<f64>().unwrap(), 2.0);
        assert_eq!(rows[1][5].parse::<f64>().unwrap(), 49.75);
        assert_eq!(rows[1][9].parse::<f64>().unwrap(), 99.5);
        assert_eq!(&rows[1][21], "rush order");
    }

    #[test]
    fn export_of_empty_ledger_returns_false_and_writes_nothing() {
        let (dir, ledger) = ledger(10);
        let path = dir.path().join("export.csv");
        assert!(!ledger.export_csv(&path, None).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn snapshot_copies_all_retained_rows() {
        let (dir, mut ledger) = ledger(10);
        for i in 0..3 {
            ledger
                .record(&draft(&format!("c{i}"), "CRM Pro", "10"))
                .unwrap();
        }
        let dest = dir.path().join("backup.db");
        ledger.snapshot(&dest).unwrap();

        let copy = Connection::open(&dest).unwrap();
        let count: i64 = copy
            .query_row("SELECT COUNT(*) FROM purchases", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }
}
