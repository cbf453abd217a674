//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - publisher(id, name)
//! - book(id, title, id_publisher?)
//! - shop(id, name)
//! - stock(id, id_book, id_shop, count)
//! - sale(id, price, date_sale, id_stock, count)

pub mod schema;
pub mod sqlite;

pub use sqlite::{BookshopStore, CommitSummary, TableCounts};
