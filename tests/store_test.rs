//! Integration tests: generate CSV files, load them into DuckDB, analyze.

use chrono::NaiveDate;
use shopdata::analysis::{customer_spending, summarize};
use shopdata::store::Store;
use shopdata_gen::{CsvRenderer, Dataset, Generator, GeneratorConfig};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn small_dataset(seed: u64) -> Dataset {
    let config = GeneratorConfig {
        seed,
        customers: 30,
        products: 20,
        orders: 60,
        reference_date: NaiveDate::from_ymd_opt(2025, 3, 15),
        ..Default::default()
    };
    Generator::new(config).unwrap().generate().unwrap()
}

fn write_csv(data: &Dataset, dir: &Path) {
    CsvRenderer::new().write_all(data, dir).unwrap();
}

fn setup() -> (TempDir, Dataset) {
    let temp_dir = TempDir::new().unwrap();
    let data = small_dataset(42);
    write_csv(&data, &temp_dir.path().join("data"));
    (temp_dir, data)
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_load_counts_match_dataset() {
    let (temp_dir, data) = setup();
    let mut store = Store::open(&temp_dir.path().join("shop.duckdb")).unwrap();

    let stats = store.load_dir(&temp_dir.path().join("data"), false).unwrap();

    assert_eq!(stats.tables.len(), 5);
    for (import, (table, rows)) in stats.tables.iter().zip(data.row_counts()) {
        assert_eq!(import.table, table);
        assert_eq!(import.rows_read, rows as u64);
        assert_eq!(import.rows_inserted, rows as u64);
    }
    assert_eq!(stats.rows_inserted(), data.total_rows() as u64);
}

#[test]
fn test_load_twice_replaces_data() {
    let (temp_dir, data) = setup();
    let mut store = Store::open_in_memory().unwrap();
    let dir = temp_dir.path().join("data");

    store.load_dir(&dir, false).unwrap();
    store.load_dir(&dir, false).unwrap();

    assert_eq!(
        store.count_rows("orders").unwrap(),
        data.orders.len() as i64
    );
}

#[test]
fn test_missing_file_rolls_back() {
    let (temp_dir, data) = setup();
    let mut store = Store::open_in_memory().unwrap();
    store.load_dir(&temp_dir.path().join("data"), false).unwrap();

    let broken = temp_dir.path().join("broken");
    write_csv(&small_dataset(7), &broken);
    fs::remove_file(broken.join("reviews.csv")).unwrap();

    let err = store.load_dir(&broken, false).unwrap_err();
    assert!(format!("{:#}", err).contains("not found"));

    // Earlier import is untouched
    assert_eq!(
        store.count_rows("customers").unwrap(),
        data.customers.len() as i64
    );
    assert_eq!(
        store.count_rows("reviews").unwrap(),
        data.reviews.len() as i64
    );
}

#[test]
fn test_empty_file_rejected() {
    let (temp_dir, _) = setup();
    let dir = temp_dir.path().join("data");
    fs::write(dir.join("products.csv"), "").unwrap();

    let mut store = Store::open_in_memory().unwrap();
    let err = store.load_dir(&dir, false).unwrap_err();
    assert!(format!("{:#}", err).contains("is empty"));
}

#[test]
fn test_dangling_foreign_key_rejected() {
    let (temp_dir, _) = setup();
    let dir = temp_dir.path().join("data");
    fs::write(
        dir.join("order_items.csv"),
        "order_item_id,order_id,product_id,quantity,price\n1,1,9999,1,10.0\n",
    )
    .unwrap();

    let mut store = Store::open_in_memory().unwrap();
    assert!(store.load_dir(&dir, false).is_err());
}

#[test]
fn test_wrong_header_rejected() {
    let (temp_dir, _) = setup();
    let dir = temp_dir.path().join("data");
    fs::write(dir.join("customers.csv"), "id,name\n1,Alice\n").unwrap();

    let mut store = Store::open_in_memory().unwrap();
    let err = store.load_dir(&dir, false).unwrap_err();
    assert!(format!("{:#}", err).contains("expected"));
}

// =============================================================================
// Verification and analysis
// =============================================================================

#[test]
fn test_verify_matches_dataset() {
    let (temp_dir, data) = setup();
    let mut store = Store::open_in_memory().unwrap();
    store.load_dir(&temp_dir.path().join("data"), false).unwrap();

    let summary = store.verify().unwrap();

    let expected_revenue: f64 = data.orders.iter().map(|o| o.total_amount).sum();
    assert!((summary.total_revenue - expected_revenue).abs() < 0.01);

    let expected_units: i64 = data.line_items.iter().map(|i| i.quantity).sum();
    assert_eq!(summary.total_products_sold, expected_units);

    let status_total: i64 = summary.orders_by_status.iter().map(|(_, n)| n).sum();
    assert_eq!(status_total, data.orders.len() as i64);
    assert!(summary
        .orders_by_status
        .windows(2)
        .all(|pair| pair[0].1 >= pair[1].1));

    assert_eq!(summary.average_rating.is_some(), !data.reviews.is_empty());
}

#[test]
fn test_customer_spending_matches_dataset() {
    let (temp_dir, data) = setup();
    let mut store = Store::open_in_memory().unwrap();
    store.load_dir(&temp_dir.path().join("data"), false).unwrap();

    let rows = customer_spending(&store).unwrap();

    let buyers: HashSet<i64> = data.orders.iter().map(|o| o.customer_id).collect();
    assert_eq!(rows.len(), buyers.len());
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].total_amount_spent >= pair[1].total_amount_spent));

    let orders: i64 = rows.iter().map(|r| r.total_orders).sum();
    assert_eq!(orders, data.orders.len() as i64);

    let items: i64 = rows.iter().map(|r| r.total_items_purchased).sum();
    let expected_items: i64 = data.line_items.iter().map(|i| i.quantity).sum();
    assert_eq!(items, expected_items);

    let summary = summarize(&rows);
    let expected_revenue: f64 = data.line_items.iter().map(|i| i.subtotal()).sum();
    assert!((summary.total_revenue - expected_revenue).abs() < 0.01 * rows.len() as f64);
    assert_eq!(
        summary.top_customer.map(|(_, spent)| spent),
        rows.first().map(|r| r.total_amount_spent)
    );
}
