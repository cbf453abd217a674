//! Entity types for the bookshop domain
//!
//! Five entities, related only through explicit foreign-key ids:
//! - `Publisher` 1:N `Book` (a book may have no publisher)
//! - `Book` 1:N `Stock`, `Shop` 1:N `Stock`
//! - `Stock` 1:N `Sale`
//!
//! There are no back-pointers. Navigating a relationship is a lookup on the
//! store (see [`crate::storage::BookshopStore::stock_for_shop`] and friends).

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum publisher name length, in characters
pub const PUBLISHER_NAME_MAX: usize = 120;
/// Maximum book title length, in characters
pub const BOOK_TITLE_MAX: usize = 200;
/// Maximum shop name length, in characters
pub const SHOP_NAME_MAX: usize = 200;

/// The closed set of record kinds a seed file may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Publisher,
    Book,
    Shop,
    Stock,
    Sale,
}

impl ModelKind {
    /// Get the string representation of the model kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Publisher => "publisher",
            ModelKind::Book => "book",
            ModelKind::Shop => "shop",
            ModelKind::Stock => "stock",
            ModelKind::Sale => "sale",
        }
    }

    /// Table backing this kind. Table names match the model labels.
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    /// All kinds, parents before children
    pub fn all() -> &'static [ModelKind] {
        &[
            ModelKind::Publisher,
            ModelKind::Book,
            ModelKind::Shop,
            ModelKind::Stock,
            ModelKind::Sale,
        ]
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "publisher" => Ok(ModelKind::Publisher),
            "book" => Ok(ModelKind::Book),
            "shop" => Ok(ModelKind::Shop),
            "stock" => Ok(ModelKind::Stock),
            "sale" => Ok(ModelKind::Sale),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted entity type, tied to its model kind.
pub trait Entity {
    const KIND: ModelKind;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

impl std::fmt::Display for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Publisher {}: {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Folk tales and anonymous works have no publisher
    pub publisher_id: Option<i64>,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Book {}: {}", self.id, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
}

impl std::fmt::Display for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Shop {}: {}", self.id, self.name)
    }
}

/// On-hand quantity of one book in one shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub book_id: i64,
    pub shop_id: i64,
    pub count: i64,
}

impl std::fmt::Display for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stock {}: book {} in shop {} (x{})",
            self.id, self.book_id, self.shop_id, self.count
        )
    }
}

/// A sale event against one stock line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub price: f64,
    pub date: NaiveDate,
    pub stock_id: i64,
    pub count: i64,
}

impl std::fmt::Display for Sale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sale {}: {} x{} on {} (stock {})",
            self.id, self.price, self.count, self.date, self.stock_id
        )
    }
}

impl Entity for Publisher {
    const KIND: ModelKind = ModelKind::Publisher;
}

impl Entity for Book {
    const KIND: ModelKind = ModelKind::Book;
}

impl Entity for Shop {
    const KIND: ModelKind = ModelKind::Shop;
}

impl Entity for Stock {
    const KIND: ModelKind = ModelKind::Stock;
}

impl Entity for Sale {
    const KIND: ModelKind = ModelKind::Sale;
}

/// Parse a sale date in any of the formats seed data uses.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// and `DD-MM-YYYY`. Timestamps keep only their date part.
pub fn parse_sale_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%d-%m-%Y").map_err(|_| Error::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parse() {
        for kind in ModelKind::all() {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let err = "author".parse::<ModelKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownModel(ref m) if m == "author"));
        assert_eq!(err.to_string(), "author: unknown model");

        // Labels are exact, not case-folded
        assert!("Book".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2018, 10, 25).unwrap();
        assert_eq!(parse_sale_date("2018-10-25").unwrap(), expected);
        assert_eq!(parse_sale_date("2018-10-25T09:45:24.552Z").unwrap(), expected);
        assert_eq!(parse_sale_date("2018-10-25T09:45:24").unwrap(), expected);
        assert_eq!(parse_sale_date("25-10-2018").unwrap(), expected);
        assert!(matches!(parse_sale_date("yesterday"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_display() {
        let publisher = Publisher { id: 1, name: "O’Reilly".to_string() };
        assert_eq!(publisher.to_string(), "Publisher 1: O’Reilly");

        let book = Book { id: 4, title: "Детство".to_string(), publisher_id: None };
        assert_eq!(book.to_string(), "Book 4: Детство");
    }
}
