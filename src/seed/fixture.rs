//! Fixture file reader
//!
//! A fixture is a JSON array of records:
//!
//! ```json
//! [
//!   {"model": "publisher", "pk": 1, "fields": {"name": "O’Reilly"}},
//!   {"model": "sale", "pk": 1, "fields": {"price": "50.05", "date_sale": "2018-10-25T09:45:24.552Z", "count": 16, "id_stock": 1}}
//! ]
//! ```
//!
//! `pk` and any `id` field are dropped so the store assigns primary keys.
//! Foreign keys (`id_publisher`, `id_book`, ...) are taken as ids of stored rows.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{NewBook, NewEntity, NewPublisher, NewSale, NewShop, NewStock, Ref, SeedBatch};
use crate::model::{self, ModelKind};
use crate::{Error, Result};

/// A record as it appears in the file, before its kind is known
#[derive(Debug, Deserialize)]
struct RawRecord {
    model: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PublisherFields {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BookFields {
    title: String,
    #[serde(default)]
    id_publisher: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShopFields {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StockFields {
    id_book: i64,
    id_shop: i64,
    count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SaleFields {
    price: f64,
    date_sale: String,
    id_stock: i64,
    count: i64,
}

/// Read and parse a fixture file into a batch. Nothing is written.
pub fn load_fixture_file(path: &Path) -> Result<SeedBatch> {
    let contents = std::fs::read_to_string(path)?;
    let batch = parse_fixture(&contents)?;
    tracing::info!("Parsed {} seed records from {}", batch.len(), path.display());
    Ok(batch)
}

/// Parse fixture JSON into a batch.
///
/// Every record is validated before the batch is returned, so an unknown
/// model anywhere in the file means nothing from it reaches the store.
pub fn parse_fixture(json: &str) -> Result<SeedBatch> {
    let records: Vec<RawRecord> = serde_json::from_str(json)?;
    let mut batch = SeedBatch::new();

    for (index, record) in records.into_iter().enumerate() {
        let kind: ModelKind = record.model.parse()?;
        let entity = build_entity(kind, record.fields)
            .map_err(|e| annotate(e, index, kind))?;
        batch.push(entity);
    }

    Ok(batch)
}

fn build_entity(kind: ModelKind, mut fields: Map<String, Value>) -> Result<NewEntity> {
    // Primary keys come from the store
    fields.remove("id");

    if let Some(price) = fields.remove("price") {
        fields.insert("price".to_string(), Value::from(coerce_price(&price)?));
    }

    let fields = Value::Object(fields);
    let entity = match kind {
        ModelKind::Publisher => {
            let f: PublisherFields = serde_json::from_value(fields)?;
            check_length("name", &f.name, model::PUBLISHER_NAME_MAX)?;
            NewEntity::Publisher(NewPublisher { name: f.name })
        }
        ModelKind::Book => {
            let f: BookFields = serde_json::from_value(fields)?;
            check_length("title", &f.title, model::BOOK_TITLE_MAX)?;
            NewEntity::Book(NewBook {
                title: f.title,
                publisher: f.id_publisher.map(Ref::stored),
            })
        }
        ModelKind::Shop => {
            let f: ShopFields = serde_json::from_value(fields)?;
            check_length("name", &f.name, model::SHOP_NAME_MAX)?;
            NewEntity::Shop(NewShop { name: f.name })
        }
        ModelKind::Stock => {
            let f: StockFields = serde_json::from_value(fields)?;
            NewEntity::Stock(NewStock {
                book: Ref::stored(f.id_book),
                shop: Ref::stored(f.id_shop),
                count: f.count,
            })
        }
        ModelKind::Sale => {
            let f: SaleFields = serde_json::from_value(fields)?;
            NewEntity::Sale(NewSale {
                price: f.price,
                date: model::parse_sale_date(&f.date_sale)?,
                stock: Ref::stored(f.id_stock),
                count: f.count,
            })
        }
    };
    Ok(entity)
}

/// Prices may arrive as JSON numbers or as text; both become `f64`.
pub fn coerce_price(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::InvalidPrice(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| Error::InvalidPrice(s.clone())),
        other => Err(Error::InvalidPrice(other.to_string())),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::InvalidRecord(format!(
            "{} is {} characters long, at most {} allowed",
            field, len, max
        )));
    }
    Ok(())
}

fn annotate(err: Error, index: usize, kind: ModelKind) -> Error {
    match err {
        Error::Json(e) => Error::InvalidRecord(format!("record {} ({}): {}", index, kind, e)),
        Error::InvalidRecord(msg) => Error::InvalidRecord(format!("record {} ({}): {}", index, kind, msg)),
        other => other,
    }
}
