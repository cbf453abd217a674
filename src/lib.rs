//! # Bookshop - sales database over SQLite
//!
//! A small relational loader and query tool for a bookshop domain.
//!
//! Bookshop provides:
//! - A five-table schema (publisher, book, shop, stock, sale) with foreign keys
//!   and named check constraints
//! - A transactional seed loader for JSON fixture files and an inline demo graph
//! - A publisher sales query joining books, stock lines, shops and sales
//! - An interactive search shell and a `clap` CLI on top

pub mod model;
pub mod storage;
pub mod seed;
pub mod query;
pub mod shell;
pub mod config;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use model::{Book, ModelKind, Publisher, Sale, Shop, Stock};
pub use query::{SaleRecord, SalesQuery};
pub use seed::{Ref, SeedBatch};
pub use storage::{BookshopStore, TableCounts};

/// Result type alias for Bookshop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bookshop operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("{0}: unknown model")]
    UnknownModel(String),

    #[error("Invalid seed record: {0}")]
    InvalidRecord(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify a SQLite failure, pulling constraint violations out of the generic storage bucket
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, Some(message))
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Constraint(message.clone())
            }
            _ => Error::Storage(err),
        }
    }
}
