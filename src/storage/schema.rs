//! Database schema definitions
//!
//! Column names follow the seed-file field names (`id_publisher`, `date_sale`, ...).

/// SQL to create the publisher table
pub const CREATE_PUBLISHER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS publisher (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(120) NOT NULL,
    CONSTRAINT check_publisher_name_length CHECK (length(name) <= 120)
)
"#;

/// SQL to create the book table
/// `id_publisher` is nullable: a book may have no publisher
pub const CREATE_BOOK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS book (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(200) NOT NULL,
    id_publisher INTEGER REFERENCES publisher(id),
    CONSTRAINT check_book_title_length CHECK (length(title) <= 200)
)
"#;

/// SQL to create the shop table
pub const CREATE_SHOP_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS shop (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(200) NOT NULL,
    CONSTRAINT check_shop_name_length CHECK (length(name) <= 200)
)
"#;

/// SQL to create the stock table
pub const CREATE_STOCK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stock (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    id_book INTEGER NOT NULL REFERENCES book(id),
    id_shop INTEGER NOT NULL REFERENCES shop(id),
    count INTEGER NOT NULL,
    CONSTRAINT check_count_positive CHECK (count >= 0)
)
"#;

/// SQL to create the sale table
/// A price of zero is a giveaway and is allowed
pub const CREATE_SALE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sale (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    price REAL NOT NULL,
    date_sale DATE NOT NULL,
    id_stock INTEGER NOT NULL REFERENCES stock(id),
    count INTEGER NOT NULL,
    CONSTRAINT check_price_positive CHECK (price >= 0),
    CONSTRAINT check_count_positive CHECK (count >= 0)
)
"#;

/// SQL to create indexes on the foreign-key columns used for relationship lookups
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_book_publisher ON book(id_publisher)",
    "CREATE INDEX IF NOT EXISTS idx_stock_book ON stock(id_book)",
    "CREATE INDEX IF NOT EXISTS idx_stock_shop ON stock(id_shop)",
    "CREATE INDEX IF NOT EXISTS idx_sale_stock ON sale(id_stock)",
];

/// Drop statements, children before parents so foreign keys never dangle
pub const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS sale",
    "DROP TABLE IF EXISTS stock",
    "DROP TABLE IF EXISTS book",
    "DROP TABLE IF EXISTS shop",
    "DROP TABLE IF EXISTS publisher",
];

/// All schema creation statements, parents before children
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_PUBLISHER_TABLE,
        CREATE_BOOK_TABLE,
        CREATE_SHOP_TABLE,
        CREATE_STOCK_TABLE,
        CREATE_SALE_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
