//! Product catalog
//!
//! CRUD store with a soft active flag: deactivation is a status change,
//! never a delete, and inactive products stay reachable by id. An empty
//! catalog is seeded exactly once, from a CSV seed file when one is
//! present and parseable, otherwise from a built-in sample set.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use super::schema::{PRODUCTS_ADDED_COLUMNS, PRODUCTS_SCHEMA};
use super::{ensure_columns, now_stamp, open_connection, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub tax_rate: f64,
    pub unit: String,
    pub description: String,
    pub features: String,
    pub best_for: String,
    pub active: bool,
}

/// New-product fields. Numeric fields arrive as raw text and are coerced
/// to zero when unparsable; strings are trimmed on insert.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: String,
    pub cost: String,
    pub tax_rate: String,
    pub unit: String,
    pub description: String,
    pub features: String,
    pub best_for: String,
}

/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub tax_rate: Option<f64>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub features: Option<String>,
    pub best_for: Option<String>,
    pub active: Option<bool>,
}

fn coerce_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

const PRODUCT_FIELDS: &str = "id, name, sku, category, price, cost, tax_rate, unit, \
     description, features, best_for, active";

fn map_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        category: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        price: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
        cost: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
        tax_rate: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
        unit: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        features: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        best_for: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        active: row.get::<_, i64>(11)? != 0,
    })
}

struct SeedRow {
    name: String,
    sku: String,
    category: String,
    price: f64,
    features: String,
    best_for: String,
}

const BUILTIN_SAMPLES: &[(&str, &str, &str, f64, &str, &str)] = &[
    (
        "CRM Pro",
        "CRM-001",
        "CRM",
        99.0,
        "Contact management, email tracking, basic reporting",
        "Small teams",
    ),
    (
        "Analytics Suite",
        "ANL-101",
        "Analytics",
        149.0,
        "Dashboards, predictive insights, custom reports",
        "Data teams",
    ),
    (
        "Marketing Tool",
        "MKT-201",
        "Marketing",
        79.0,
        "Email campaigns, social scheduling, A/B testing",
        "Marketing teams",
    ),
];

/// Parse the whole seed file up front; a file that fails anywhere falls
/// back to the built-in samples rather than half-seeding the catalog.
fn read_seed_file(path: &Path) -> Option<Vec<SeedRow>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(err) => {
            warn!("failed to read product seed file: {err}");
            return None;
        }
    };
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!("failed to read product seed header: {err}");
            return None;
        }
    };

    let field = |record: &csv::StringRecord, names: &[&str]| -> String {
        for name in names {
            if let Some(pos) = headers.iter().position(|h| h == *name) {
                if let Some(value) = record.get(pos) {
                    if !value.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        String::new()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("failed to parse product seed row: {err}");
                return None;
            }
        };
        let name = field(&record, &["name", "Product_Name"]).trim().to_string();
        if name.is_empty() {
            continue;
        }
        rows.push(SeedRow {
            name,
            sku: String::new(),
            category: String::new(),
            price: coerce_number(&field(&record, &["price", "Price"])),
            features: field(&record, &["features", "Features"]),
            best_for: field(&record, &["best_for", "Best_For"]),
        });
    }
    Some(rows)
}

pub struct ProductCatalog {
    conn: Connection,
}

impl ProductCatalog {
    pub fn open(
        path: &Path,
        busy_timeout: Duration,
        seed_file: Option<&Path>,
    ) -> Result<Self, StoreError> {
        let mut conn = open_connection(path, busy_timeout)?;
        conn.execute_batch(PRODUCTS_SCHEMA)?;
        ensure_columns(&mut conn, "products", PRODUCTS_ADDED_COLUMNS)?;
        let mut catalog = Self { conn };
        catalog.seed_if_empty(seed_file)?;
        Ok(catalog)
    }

    /// Seed the catalog once. Never runs when any row already exists.
    fn seed_if_empty(&mut self, seed_file: Option<&Path>) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let now = now_stamp();
        let mut rows = seed_file
            .filter(|p| p.exists())
            .and_then(read_seed_file)
            .unwrap_or_default();
        if rows.is_empty() {
            rows = BUILTIN_SAMPLES
                .iter()
                .map(|(name, sku, category, price, features, best_for)| SeedRow {
                    name: name.to_string(),
                    sku: sku.to_string(),
                    category: category.to_string(),
                    price: *price,
                    features: features.to_string(),
                    best_for: best_for.to_string(),
                })
                .collect();
        }

        for row in rows {
            tx.execute(
                "INSERT INTO products (
                    name, sku, category, price, cost, tax_rate, unit,
                    description, features, best_for, active, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, 0.0, 0.0, '', '', ?, ?, 1, ?, ?)",
                params![row.name, row.sku, row.category, row.price, row.features, row.best_for, now, now],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Products in id order; inactive rows only when `active_only` is off.
    pub fn list(&self, active_only: bool) -> Result<Vec<Product>, StoreError> {
        let mut sql = format!("SELECT {PRODUCT_FIELDS} FROM products");
        if active_only {
            sql.push_str(" WHERE active = 1");
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_product)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PRODUCT_FIELDS} FROM products WHERE id = ?"),
                params![id],
                map_product,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn add(&mut self, input: &ProductInput) -> Result<(), StoreError> {
        let now = now_stamp();
        self.conn.execute(
            "INSERT INTO products (
                name, sku, category, price, cost, tax_rate, unit, description,
                features, best_for, active, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
            params![
                input.name.trim(),
                input.sku.trim(),
                input.category.trim(),
                coerce_number(&input.price),
                coerce_number(&input.cost),
                coerce_number(&input.tax_rate),
                input.unit.trim(),
                input.description.trim(),
                input.features.trim(),
                input.best_for.trim(),
                now,
                now,
            ],
        )?;
        Ok(())
    }

    /// Apply the supplied fields and bump `updated_at`.
    ///
    /// Returns false when the patch carries nothing to apply.
    pub fn update(&mut self, id: i64, patch: &ProductPatch) -> Result<bool, StoreError> {
        let mut assignments: Vec<String> = Vec::new();
        let mut bindings: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        macro_rules! apply {
            ($field:ident) => {
                if let Some(value) = &patch.$field {
                    assignments.push(format!("{} = ?", stringify!($field)));
                    bindings.push(Box::new(value.clone()));
                }
            };
        }

        apply!(name);
        apply!(sku);
        apply!(category);
        apply!(price);
        apply!(cost);
        apply!(tax_rate);
        apply!(unit);
        apply!(description);
        apply!(features);
        apply!(best_for);
        if let Some(active) = patch.active {
            assignments.push("active = ?".to_string());
            bindings.push(Box::new(active as i64));
        }

        if assignments.is_empty() {
            return Ok(false);
        }

        assignments.push("updated_at = ?".to_string());
        bindings.push(Box::new(now_stamp()));
        bindings.push(Box::new(id));

        let sql = format!(
            "UPDATE products SET {} WHERE id = ?",
            assignments.join(", ")
        );
        self.conn.execute(
            &sql,
            rusqlite::params_from_iter(bindings.iter().map(|b| b.as_ref())),
        )?;
        Ok(true)
    }

    pub fn deactivate(&mut self, id: i64) -> Result<bool, StoreError> {
        self.update(
            id,
            &ProductPatch {
                active: Some(false),
                ..ProductPatch::default()
            },
        )
    }

    pub fn activate(&mut self, id: i64) -> Result<bool, StoreError> {
        self.update(
            id,
            &ProductPatch {
                active: Some(true),
                ..ProductPatch::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_millis(5000);

    fn catalog(seed_file: Option<&Path>) -> (TempDir, ProductCatalog) {
        let dir = TempDir::new().unwrap();
        let catalog = ProductCatalog::open(&dir.path().join("products.db"), TIMEOUT, seed_file).unwrap();
        (dir, catalog)
    }

    #[test]
    fn empty_catalog_seeds_three_builtin_samples() {
        let (_dir, catalog) = catalog(None);
        let products = catalog.list(false).unwrap();
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.active));
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["CRM Pro", "Analytics Suite", "Marketing Tool"]);
    }

    #[test]
    fn seed_file_takes_precedence_over_samples() {
        let dir = TempDir::new().unwrap();
        let seed = dir.path().join("products.csv");
        let mut file = std::fs::File::create(&seed).unwrap();
        writeln!(file, "name,price,features,best_for").unwrap();
        writeln!(file, "Widget,12.5,Spins fast,Hobbyists").unwrap();
        drop(file);

        let catalog =
            ProductCatalog::open(&dir.path().join("products.db"), TIMEOUT, Some(&seed)).unwrap();
        let products = catalog.list(false).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(products[0].price, 12.5);
        assert_eq!(products[0].best_for, "Hobbyists");
    }

    #[test]
    fn seed_file_accepts_capitalized_headers() {
        let dir = TempDir::new().unwrap();
        let seed = dir.path().join("products.csv");
        let mut file = std::fs::File::create(&seed).unwrap();
        writeln!(file, "Product_Name,Price,Features,Best_For").unwrap();
        writeln!(file, "Gadget,20,Blinks,Tinkerers").unwrap();
        drop(file);

        let catalog =
            ProductCatalog::open(&dir.path().join("products.db"), TIMEOUT, Some(&seed)).unwrap();
        let products = catalog.list(false).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Gadget");
        assert_eq!(products[0].price, 20.0);
    }

    #[test]
    fn seeding_never_reruns_once_rows_exist() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("products.db");
        {
            let catalog = ProductCatalog::open(&db, TIMEOUT, None).unwrap();
            assert_eq!(catalog.list(false).unwrap().len(), 3);
        }
        let catalog = ProductCatalog::open(&db, TIMEOUT, None).unwrap();
        assert_eq!(catalog.list(false).unwrap().len(), 3);
    }

    #[test]
    fn add_coerces_numbers_and_trims_strings() {
        let (_dir, mut catalog) = catalog(None);
        catalog
            .add(&ProductInput {
                name: "  Support Plan  ".to_string(),
                price: "not a price".to_string(),
                cost: "5".to_string(),
                tax_rate: "0.2".to_string(),
                ..ProductInput::default()
            })
            .unwrap();
        let products = catalog.list(false).unwrap();
        let added = products.last().unwrap();
        assert_eq!(added.name, "Support Plan");
        assert_eq!(added.price, 0.0);
        assert_eq!(added.cost, 5.0);
        assert_eq!(added.tax_rate, 0.2);
    }

    #[test]
    fn update_applies_recognized_fields_and_bumps_updated_at() {
        let (_dir, mut catalog) = catalog(None);
        let id = catalog.list(false).unwrap()[0].id;

        let before: String = catalog
            .conn
            .query_row("SELECT updated_at FROM products WHERE id = ?", [id], |r| r.get(0))
            .unwrap();

        let changed = catalog
            .update(
                id,
                &ProductPatch {
                    price: Some(129.0),
                    category: Some("Sales".to_string()),
                    ..ProductPatch::default()
                },
            )
            .unwrap();
        assert!(changed);

        let product = catalog.get(id).unwrap().unwrap();
        assert_eq!(product.price, 129.0);
        assert_eq!(product.category, "Sales");

        let after: String = catalog
            .conn
            .query_row("SELECT updated_at FROM products WHERE id = ?", [id], |r| r.get(0))
            .unwrap();
        assert!(after >= before);
    }

    #[test]
    fn empty_patch_is_reported_as_no_change() {
        let (_dir, mut catalog) = catalog(None);
        let id = catalog.list(false).unwrap()[0].id;
        assert!(!catalog.update(id, &ProductPatch::default()).unwrap());
    }

    #[test]
    fn deactivation_hides_from_default_listing_only() {
        let (_dir, mut catalog) = catalog(None);
        let id = catalog.list(true).unwrap()[0].id;
        catalog.deactivate(id).unwrap();

        assert!(catalog.list(true).unwrap().iter().all(|p| p.id != id));
        assert_eq!(catalog.list(false).unwrap().len(), 3);

        let product = catalog.get(id).unwrap().unwrap();
        assert!(!product.active);

        catalog.activate(id).unwrap();
        assert!(catalog.get(id).unwrap().unwrap().active);
    }
}
