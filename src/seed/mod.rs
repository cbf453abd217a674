//! Seed loading - queued inserts flushed in one transaction
//!
//! A [`SeedBatch`] collects new entities in insertion order. Cross-references
//! between them are [`Ref`] handles: either the id of a row already in the
//! store, or the position of an earlier entry in the same batch. Nothing
//! touches the database until [`crate::BookshopStore::commit`] runs, and that
//! commit is all-or-nothing.

pub mod demo;
pub mod fixture;

pub use demo::demo_batch;
pub use fixture::{load_fixture_file, parse_fixture};

use crate::model::{Book, Entity, ModelKind, Publisher, Sale, Shop, Stock};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Stored(i64),
    Queued(usize),
}

/// Typed handle to a row of entity `T`, stored or still queued.
pub struct Ref<T> {
    target: Target,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T> std::fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target {
            Target::Stored(id) => write!(f, "Ref(id {})", id),
            Target::Queued(pos) => write!(f, "Ref(#{})", pos),
        }
    }
}

impl<T: Entity> Ref<T> {
    /// Handle to a row that already exists in the store
    pub fn stored(id: i64) -> Self {
        Self { target: Target::Stored(id), _kind: PhantomData }
    }

    fn queued(position: usize) -> Self {
        Self { target: Target::Queued(position), _kind: PhantomData }
    }

    /// Turn the handle into a row id, given the ids assigned so far in this commit.
    ///
    /// `assigned[i]` holds the kind and id of batch entry `i`. A queued handle
    /// must point at an earlier entry of the same kind.
    pub(crate) fn resolve(&self, assigned: &[(ModelKind, i64)]) -> Result<i64> {
        match self.target {
            Target::Stored(id) => Ok(id),
            Target::Queued(pos) => match assigned.get(pos) {
                Some((kind, id)) if *kind == T::KIND => Ok(*id),
                Some((kind, _)) => Err(Error::InvalidReference(format!(
                    "entry #{} is a {}, expected a {}",
                    pos,
                    kind,
                    T::KIND
                ))),
                None => Err(Error::InvalidReference(format!(
                    "entry #{} ({}) is not inserted before its use",
                    pos,
                    T::KIND
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPublisher {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub publisher: Option<Ref<Publisher>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShop {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    pub book: Ref<Book>,
    pub shop: Ref<Shop>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub price: f64,
    pub date: NaiveDate,
    pub stock: Ref<Stock>,
    pub count: i64,
}

/// One queued insert. The primary key is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub enum NewEntity {
    Publisher(NewPublisher),
    Book(NewBook),
    Shop(NewShop),
    Stock(NewStock),
    Sale(NewSale),
}

impl NewEntity {
    pub fn kind(&self) -> ModelKind {
        match self {
            NewEntity::Publisher(_) => ModelKind::Publisher,
            NewEntity::Book(_) => ModelKind::Book,
            NewEntity::Shop(_) => ModelKind::Shop,
            NewEntity::Stock(_) => ModelKind::Stock,
            NewEntity::Sale(_) => ModelKind::Sale,
        }
    }
}

/// Ordered queue of inserts committed as a unit
#[derive(Debug, Clone, Default)]
pub struct SeedBatch {
    entries: Vec<NewEntity>,
}

impl SeedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NewEntity] {
        &self.entries
    }

    /// Queue an entity without keeping a handle to it
    pub fn push(&mut self, entity: NewEntity) {
        self.entries.push(entity);
    }

    pub fn add_publisher(&mut self, name: impl Into<String>) -> Ref<Publisher> {
        self.entries.push(NewEntity::Publisher(NewPublisher { name: name.into() }));
        Ref::queued(self.entries.len() - 1)
    }

    pub fn add_book(&mut self, title: impl Into<String>, publisher: Option<Ref<Publisher>>) -> Ref<Book> {
        self.entries.push(NewEntity::Book(NewBook { title: title.into(), publisher }));
        Ref::queued(self.entries.len() - 1)
    }

    pub fn add_shop(&mut self, name: impl Into<String>) -> Ref<Shop> {
        self.entries.push(NewEntity::Shop(NewShop { name: name.into() }));
        Ref::queued(self.entries.len() - 1)
    }

    pub fn add_stock(&mut self, book: Ref<Book>, shop: Ref<Shop>, count: i64) -> Ref<Stock> {
        self.entries.push(NewEntity::Stock(NewStock { book, shop, count }));
        Ref::queued(self.entries.len() - 1)
    }

    pub fn add_sale(&mut self, price: f64, date: NaiveDate, stock: Ref<Stock>, count: i64) -> Ref<Sale> {
        self.entries.push(NewEntity::Sale(NewSale { price, date, stock, count }));
        Ref::queued(self.entries.len() - 1)
    }
}
