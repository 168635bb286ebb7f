//! SQLite schema definitions
//!
//! Each table is created with its baseline columns; every column the schema
//! gained later lives in the `*_ADDED_COLUMNS` lists and is applied
//! additively on startup. Columns are never dropped or renamed.

// ============================================
// PURCHASES
// ============================================

pub const PURCHASES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS purchases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    customer TEXT NOT NULL,
    customer_email TEXT,
    product TEXT NOT NULL,
    amount REAL NOT NULL,
    quantity REAL,
    unit_price REAL,
    subtotal REAL,
    discount REAL,
    tax REAL,
    total REAL,
    currency TEXT,
    status TEXT NOT NULL,
    payment_status TEXT,
    fulfillment_status TEXT,
    payment_method TEXT,
    channel TEXT,
    source TEXT,
    region TEXT,
    sales_rep TEXT,
    invoice_id TEXT,
    tags TEXT,
    notes TEXT
);
"#;

/// Columns added after the first release, applied by the additive migration.
pub const PURCHASES_ADDED_COLUMNS: &[(&str, &str)] = &[
    ("customer_email", "TEXT"),
    ("quantity", "REAL"),
    ("unit_price", "REAL"),
    ("subtotal", "REAL"),
    ("discount", "REAL"),
    ("tax", "REAL"),
    ("total", "REAL"),
    ("currency", "TEXT"),
    ("payment_status", "TEXT"),
    ("fulfillment_status", "TEXT"),
    ("payment_method", "TEXT"),
    ("channel", "TEXT"),
    ("source", "TEXT"),
    ("region", "TEXT"),
    ("sales_rep", "TEXT"),
    ("invoice_id", "TEXT"),
    ("tags", "TEXT"),
    ("notes", "TEXT"),
];

// ============================================
// CUSTOMERS
// ============================================

pub const CUSTOMERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    company TEXT,
    industry TEXT,
    segment TEXT,
    status TEXT,
    lead_source TEXT,
    address_line1 TEXT,
    address_line2 TEXT,
    city TEXT,
    state TEXT,
    country TEXT,
    postal_code TEXT,
    notes TEXT,
    last_contact_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_customers_email ON customers (email);
"#;

pub const CUSTOMERS_ADDED_COLUMNS: &[(&str, &str)] = &[
    ("industry", "TEXT"),
    ("segment", "TEXT"),
    ("status", "TEXT"),
    ("lead_source", "TEXT"),
    ("address_line1", "TEXT"),
    ("address_line2", "TEXT"),
    ("city", "TEXT"),
    ("state", "TEXT"),
    ("country", "TEXT"),
    ("postal_code", "TEXT"),
    ("last_contact_at", "TEXT"),
    ("updated_at", "TEXT"),
];

// ============================================
// PRODUCTS
// ============================================

pub const PRODUCTS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    sku TEXT,
    category TEXT,
    price REAL NOT NULL,
    cost REAL,
    tax_rate REAL,
    unit TEXT,
    description TEXT,
    features TEXT,
    best_for TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_name ON products (name);
"#;

pub const PRODUCTS_ADDED_COLUMNS: &[(&str, &str)] = &[
    ("cost", "REAL"),
    ("tax_rate", "REAL"),
    ("unit", "TEXT"),
    ("description", "TEXT"),
    ("updated_at", "TEXT"),
];
