//! Query Layer - read-only reports over the store

pub mod engine;

pub use engine::{SaleRecord, SalesQuery};
