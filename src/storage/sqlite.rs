//! SQLite storage implementation

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::schema;
use crate::model::{Book, ModelKind, Publisher, Sale, Shop, Stock};
use crate::seed::{NewEntity, SeedBatch};
use crate::{Error, Result};

/// SQLite-backed store for the bookshop tables.
///
/// Owns the single connection of a run. Pass it by reference to loaders and
/// queries; call [`BookshopStore::close`] when done. Dropping it also releases
/// the connection, which covers early returns on errors.
pub struct BookshopStore {
    conn: Connection,
}

impl BookshopStore {
    /// Open a database file (creates if doesn't exist) and ensure the schema
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create any missing tables and indexes. Existing data is left alone.
    pub fn ensure_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Drop every table and create the schema again.
    ///
    /// DESTRUCTIVE: all rows in all five tables are deleted. Only meant for a
    /// fresh demo or test database.
    pub fn reset_schema(&mut self) -> Result<()> {
        tracing::warn!("Resetting schema: dropping all bookshop tables");
        let tx = self.conn.transaction()?;
        for stmt in schema::DROP_TABLES {
            tx.execute(stmt, [])?;
        }
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// DDL of the bookshop tables and indexes, in creation order
    pub fn schema_sql(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT sql FROM sqlite_master WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )?;
        let ddl = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ddl)
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Release the connection, reporting any error from closing it
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Storage(e))
    }

    // ========== Batch Operations ==========

    /// Insert every entry of the batch inside one transaction.
    ///
    /// Either all rows are stored or none are: the first failing insert
    /// (constraint violation, dangling reference) rolls everything back.
    pub fn commit(&mut self, batch: &SeedBatch) -> Result<CommitSummary> {
        let tx = self.conn.transaction()?;
        let mut assigned: Vec<(ModelKind, i64)> = Vec::with_capacity(batch.len());
        let mut counts = TableCounts::default();

        for entry in batch.entries() {
            let id = insert_entry(&tx, entry, &assigned)?;
            tracing::debug!("Inserted {} {}", entry.kind(), id);
            counts.record(entry.kind());
            assigned.push((entry.kind(), id));
        }

        tx.commit().map_err(Error::from_sqlite)?;
        tracing::info!("Committed {} rows", assigned.len());

        Ok(CommitSummary {
            counts,
            ids: assigned.into_iter().map(|(_, id)| id).collect(),
        })
    }

    // ========== Listing ==========

    pub fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM publisher ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_publisher)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self.conn.prepare("SELECT id, title, id_publisher FROM book ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_shops(&self) -> Result<Vec<Shop>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM shop ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_shop)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_stock(&self) -> Result<Vec<Stock>> {
        let mut stmt = self.conn.prepare("SELECT id, id_book, id_shop, count FROM stock ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_stock)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_sales(&self) -> Result<Vec<Sale>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, price, date_sale, id_stock, count FROM sale ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_sale)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ========== Relationship Lookups ==========

    /// Books published by a publisher
    pub fn books_for_publisher(&self, publisher_id: i64) -> Result<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, id_publisher FROM book WHERE id_publisher = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map([publisher_id], row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Stock lines held by a shop
    pub fn stock_for_shop(&self, shop_id: i64) -> Result<Vec<Stock>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, id_book, id_shop, count FROM stock WHERE id_shop = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map([shop_id], row_to_stock)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Stock lines of a book across all shops
    pub fn stock_for_book(&self, book_id: i64) -> Result<Vec<Stock>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, id_book, id_shop, count FROM stock WHERE id_book = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map([book_id], row_to_stock)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Sales made against a stock line
    pub fn sales_for_stock(&self, stock_id: i64) -> Result<Vec<Sale>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, price, date_sale, id_stock, count FROM sale WHERE id_stock = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([stock_id], row_to_sale)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ========== Counts ==========

    /// Count rows of one table
    pub fn count(&self, kind: ModelKind) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Row counts of all five tables
    pub fn stats(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            publishers: self.count(ModelKind::Publisher)?,
            books: self.count(ModelKind::Book)?,
            shops: self.count(ModelKind::Shop)?,
            stocks: self.count(ModelKind::Stock)?,
            sales: self.count(ModelKind::Sale)?,
        })
    }
}

fn insert_entry(conn: &Connection, entry: &NewEntity, assigned: &[(ModelKind, i64)]) -> Result<i64> {
    match entry {
        NewEntity::Publisher(p) => {
            conn.execute("INSERT INTO publisher (name) VALUES (?1)", params![p.name])
                .map_err(Error::from_sqlite)?;
        }
        NewEntity::Book(b) => {
            let publisher = b.publisher.map(|r| r.resolve(assigned)).transpose()?;
            conn.execute(
                "INSERT INTO book (title, id_publisher) VALUES (?1, ?2)",
                params![b.title, publisher],
            )
            .map_err(Error::from_sqlite)?;
        }
        NewEntity::Shop(s) => {
            conn.execute("INSERT INTO shop (name) VALUES (?1)", params![s.name])
                .map_err(Error::from_sqlite)?;
        }
        NewEntity::Stock(s) => {
            conn.execute(
                "INSERT INTO stock (id_book, id_shop, count) VALUES (?1, ?2, ?3)",
                params![s.book.resolve(assigned)?, s.shop.resolve(assigned)?, s.count],
            )
            .map_err(Error::from_sqlite)?;
        }
        NewEntity::Sale(s) => {
            conn.execute(
                "INSERT INTO sale (price, date_sale, id_stock, count) VALUES (?1, ?2, ?3, ?4)",
                params![s.price, s.date, s.stock.resolve(assigned)?, s.count],
            )
            .map_err(Error::from_sqlite)?;
        }
    }
    Ok(conn.last_insert_rowid())
}

fn row_to_publisher(row: &rusqlite::Row) -> rusqlite::Result<Publisher> {
    Ok(Publisher {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        publisher_id: row.get(2)?,
    })
}

fn row_to_shop(row: &rusqlite::Row) -> rusqlite::Result<Shop> {
    Ok(Shop {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_stock(row: &rusqlite::Row) -> rusqlite::Result<Stock> {
    Ok(Stock {
        id: row.get(0)?,
        book_id: row.get(1)?,
        shop_id: row.get(2)?,
        count: row.get(3)?,
    })
}

fn row_to_sale(row: &rusqlite::Row) -> rusqlite::Result<Sale> {
    let date: NaiveDate = row.get(2)?;
    Ok(Sale {
        id: row.get(0)?,
        price: row.get(1)?,
        date,
        stock_id: row.get(3)?,
        count: row.get(4)?,
    })
}

/// Result of a committed batch
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
    pub counts: TableCounts,
    /// Assigned primary keys, one per batch entry, in batch order
    pub ids: Vec<i64>,
}

/// Row counts per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub publishers: usize,
    pub books: usize,
    pub shops: usize,
    pub stocks: usize,
    pub sales: usize,
}

impl TableCounts {
    pub fn get(&self, kind: ModelKind) -> usize {
        match kind {
            ModelKind::Publisher => self.publishers,
            ModelKind::Book => self.books,
            ModelKind::Shop => self.shops,
            ModelKind::Stock => self.stocks,
            ModelKind::Sale => self.sales,
        }
    }

    pub fn record(&mut self, kind: ModelKind) {
        match kind {
            ModelKind::Publisher => self.publishers += 1,
            ModelKind::Book => self.books += 1,
            ModelKind::Shop => self.shops += 1,
            ModelKind::Stock => self.stocks += 1,
            ModelKind::Sale => self.sales += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.publishers + self.books + self.shops + self.stocks + self.sales
    }
}

impl std::fmt::Display for TableCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Publishers: {}", self.publishers)?;
        writeln!(f, "  Books: {}", self.books)?;
        writeln!(f, "  Shops: {}", self.shops)?;
        writeln!(f, "  Stock lines: {}", self.stocks)?;
        write!(f, "  Sales: {}", self.sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{demo_batch, Ref};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_commit_demo_graph() {
        let mut store = BookshopStore::open_in_memory().unwrap();

        let summary = store.commit(&demo_batch()).unwrap();
        assert_eq!(summary.counts.total(), 25);
        assert_eq!(summary.ids.len(), 25);
        assert_eq!(summary.counts.get(ModelKind::Sale), 5);
        assert_eq!(store.stats().unwrap(), summary.counts);

        let sales = store.list_sales().unwrap();
        assert_eq!(sales[0].price, 600.0);
        assert_eq!(sales[0].date, date(2022, 11, 9));
    }

    #[test]
    fn test_relationship_lookups() {
        let mut store = BookshopStore::open_in_memory().unwrap();
        store.commit(&demo_batch()).unwrap();

        let pushkin = &store.list_publishers().unwrap()[0];
        let books = store.books_for_publisher(pushkin.id).unwrap();
        assert_eq!(books.len(), 3);
        assert_eq!(books[0].title, "Капитанская дочка");

        let bukvoed = &store.list_shops().unwrap()[0];
        assert_eq!(store.stock_for_shop(bukvoed.id).unwrap().len(), 2);

        let daughter = store.stock_for_book(books[0].id).unwrap();
        assert_eq!(daughter.len(), 2);
        assert_eq!(store.sales_for_stock(daughter[1].id).unwrap()[0].price, 580.0);
    }

    #[test]
    fn test_negative_count_rolls_back_batch() {
        let mut store = BookshopStore::open_in_memory().unwrap();

        let mut batch = SeedBatch::new();
        let book = batch.add_book("Береза", None);
        let shop = batch.add_shop("Лабиринт");
        batch.add_stock(book, shop, -1);

        let err = store.commit(&batch).unwrap_err();
        match err {
            Error::Constraint(msg) => assert!(msg.contains("check_count_positive"), "{}", msg),
            other => panic!("expected a constraint error, got {:?}", other),
        }
        assert_eq!(store.stats().unwrap().total(), 0);
    }

    #[test]
    fn test_dangling_reference_is_rejected() {
        let mut store = BookshopStore::open_in_memory().unwrap();

        let mut batch = SeedBatch::new();
        let shop = batch.add_shop("Буквоед");
        batch.add_stock(Ref::stored(42), shop, 1);

        assert!(matches!(store.commit(&batch), Err(Error::Constraint(_))));
        assert_eq!(store.count(ModelKind::Shop).unwrap(), 0);
    }

    #[test]
    fn test_reset_schema_clears_rows() {
        let mut store = BookshopStore::open_in_memory().unwrap();
        store.commit(&demo_batch()).unwrap();

        store.reset_schema().unwrap();
        assert_eq!(store.stats().unwrap(), TableCounts::default());

        // Ids start over after a reset
        let summary = store.commit(&demo_batch()).unwrap();
        assert_eq!(summary.ids[0], 1);
    }

    #[test]
    fn test_ensure_schema_keeps_rows() {
        let mut store = BookshopStore::open_in_memory().unwrap();
        store.commit(&demo_batch()).unwrap();

        store.ensure_schema().unwrap();
        assert_eq!(store.count(ModelKind::Sale).unwrap(), 5);
    }
}
