//! End-to-end checks against a file-backed database

use std::path::PathBuf;

use bookshop::config;
use bookshop::seed::{self, Ref, SeedBatch};
use bookshop::{BookshopStore, Error, ModelKind, SalesQuery, TableCounts};
use chrono::NaiveDate;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join("tests_data.json")
}

fn temp_store() -> (tempfile::TempDir, BookshopStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = BookshopStore::open(&dir.path().join("bookshop.db")).unwrap();
    (dir, store)
}

#[test]
fn reset_twice_yields_same_empty_schema() {
    let (_dir, mut store) = temp_store();
    store.commit(&seed::demo_batch()).unwrap();

    store.reset_schema().unwrap();
    let first = store.schema_sql().unwrap();
    assert_eq!(store.stats().unwrap(), TableCounts::default());

    store.reset_schema().unwrap();
    let second = store.schema_sql().unwrap();
    assert_eq!(store.stats().unwrap(), TableCounts::default());

    assert_eq!(first, second);
    assert!(first.iter().any(|ddl| ddl.contains("check_price_positive")));
    assert_eq!(first.iter().filter(|ddl| ddl.contains("check_count_positive")).count(), 2);
}

#[test]
fn fixture_file_loads_with_numeric_prices() {
    let (_dir, mut store) = temp_store();

    let batch = seed::load_fixture_file(&fixture_path()).unwrap();
    let summary = store.commit(&batch).unwrap();
    assert_eq!(summary.counts.publishers, 4);
    assert_eq!(summary.counts.sales, 6);

    let sales = store.list_sales().unwrap();
    assert_eq!(sales[0].price, "50.05".parse::<f64>().unwrap());
    assert_eq!(sales[2].price, 10.5);
    assert_eq!(sales[0].date, NaiveDate::from_ymd_opt(2018, 10, 25).unwrap());

    let rows = SalesQuery::new(&store).by_publisher("O’Reilly").unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.title.contains("Python")));
}

#[test]
fn unknown_model_in_file_persists_nothing() {
    let (dir, store) = temp_store();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"[
            {"model": "publisher", "pk": 1, "fields": {"name": "Питер"}},
            {"model": "shop", "pk": 1, "fields": {"name": "Буквоед"}},
            {"model": "warehouse", "pk": 1, "fields": {"name": "Склад"}}
        ]"#,
    )
    .unwrap();

    let err = seed::load_fixture_file(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownModel(ref m) if m == "warehouse"));
    assert_eq!(store.stats().unwrap().total(), 0);
}

#[test]
fn failing_row_rolls_back_whole_file() {
    let (dir, mut store) = temp_store();
    let path = dir.path().join("negative.json");
    std::fs::write(
        &path,
        r#"[
            {"model": "publisher", "fields": {"name": "Питер"}},
            {"model": "book", "fields": {"title": "Береза", "id_publisher": 1}},
            {"model": "shop", "fields": {"name": "Буквоед"}},
            {"model": "stock", "fields": {"id_book": 1, "id_shop": 1, "count": 2}},
            {"model": "sale", "fields": {"price": "-1", "date_sale": "2022-11-09", "id_stock": 1, "count": 1}}
        ]"#,
    )
    .unwrap();

    let batch = seed::load_fixture_file(&path).unwrap();
    match store.commit(&batch) {
        Err(Error::Constraint(msg)) => assert!(msg.contains("check_price_positive"), "{}", msg),
        other => panic!("expected a constraint error, got {:?}", other),
    }
    assert_eq!(store.stats().unwrap().total(), 0);
}

#[test]
fn negative_sale_count_persists_nothing() {
    let (_dir, mut store) = temp_store();
    store.commit(&seed::demo_batch()).unwrap();
    let stock_id = store.list_stock().unwrap()[0].id;

    let mut batch = SeedBatch::new();
    let date = NaiveDate::from_ymd_opt(2022, 11, 10).unwrap();
    batch.add_sale(100.0, date, Ref::stored(stock_id), 1);
    batch.add_sale(100.0, date, Ref::stored(stock_id), -3);

    assert!(matches!(store.commit(&batch), Err(Error::Constraint(_))));
    assert_eq!(store.count(ModelKind::Sale).unwrap(), 5);
}

#[test]
fn publisher_query_over_demo_graph() {
    let (_dir, mut store) = temp_store();
    store.commit(&seed::demo_batch()).unwrap();
    let query = SalesQuery::new(&store);

    let pushkin = query.by_publisher("Пушкин").unwrap();
    assert_eq!(pushkin.len(), 2);
    assert!(pushkin.iter().all(|r| r.title == "Капитанская дочка"));
    assert_ne!(pushkin[0].shop, pushkin[1].shop);
    let mut prices: Vec<f64> = pushkin.iter().map(|r| r.price).collect();
    prices.sort_by(f64::total_cmp);
    assert_eq!(prices, vec![580.0, 600.0]);

    assert!(query.by_publisher("Булгаков").unwrap().is_empty());
    assert_eq!(query.by_publisher("").unwrap().len(), 5);
}

#[test]
fn store_reopens_with_data_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bookshop.db");

    let mut store = BookshopStore::open(&db).unwrap();
    store.commit(&seed::demo_batch()).unwrap();
    store.close().unwrap();

    let store = BookshopStore::open(&db).unwrap();
    assert_eq!(store.count(ModelKind::Book).unwrap(), 9);
    store.close().unwrap();
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = config::load_config(&dir.path().join("bookshop.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(_)));
}
