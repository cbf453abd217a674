//! Publisher sales query
//!
//! Joins book → stock → sale, stock → shop and book → publisher, and keeps the
//! sales of books whose publisher name contains a given substring.

use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::storage::BookshopStore;
use crate::Result;

/// Match is literal and case-sensitive; an empty needle matches every publisher.
/// Books without a publisher never appear (inner join).
const SALES_BY_PUBLISHER: &str = r#"
SELECT b.title, sh.name, s.price, s.date_sale
FROM book b
JOIN stock st ON st.id_book = b.id
JOIN sale s ON s.id_stock = st.id
JOIN shop sh ON sh.id = st.id_shop
JOIN publisher p ON p.id = b.id_publisher
WHERE ?1 = '' OR instr(p.name, ?1) > 0
ORDER BY s.id
"#;

/// One sale of a book: what, where, for how much and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub title: String,
    pub shop: String,
    pub price: f64,
    pub date: NaiveDate,
}

/// Read-only sales queries over a store
pub struct SalesQuery<'a> {
    store: &'a BookshopStore,
}

impl<'a> SalesQuery<'a> {
    pub fn new(store: &'a BookshopStore) -> Self {
        Self { store }
    }

    /// All sales of books whose publisher name contains `publisher`.
    ///
    /// No match is an empty vector, not an error. Rows come back in sale order.
    pub fn by_publisher(&self, publisher: &str) -> Result<Vec<SaleRecord>> {
        let mut stmt = self.store.connection().prepare_cached(SALES_BY_PUBLISHER)?;
        let rows = stmt
            .query_map(params![publisher], |row| {
                Ok(SaleRecord {
                    title: row.get(0)?,
                    shop: row.get(1)?,
                    price: row.get(2)?,
                    date: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Publisher filter {:?} matched {} sales", publisher, rows.len());
        Ok(rows)
    }
}
