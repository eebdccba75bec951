use std::path::PathBuf;

use chrono::NaiveDate;

use crate::csv_reader::{read_categories, read_transactions, LoadError};
use crate::dataset::Dataset;

#[test]
fn test_read_transactions() {
    let rows = read_transactions(&fixture_filename("transactions.csv")).unwrap();
    assert_eq!(rows.len(), 5);

    assert_eq!(rows[0].household_id, "1000101");
    assert_eq!(rows[0].description, "WOOLWORTHS SYDNEY");
    assert_eq!(rows[0].amount, -32.5);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert_eq!(rows[0].categorized_as.as_deref(), Some("42"));

    // Timestamp dates keep only the calendar date
    assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
    assert_eq!(rows[2].categorized_as, None);

    // dd/mm/yyyy dates and currency-formatted amounts
    assert_eq!(rows[3].date, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
    assert_eq!(rows[4].amount, 1200.0);
}

#[test]
fn test_read_categories() {
    let categories = read_categories(&fixture_filename("categories.csv")).unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].household_id, "1000101");
    assert_eq!(categories[0].category_id, "42");
    assert_eq!(categories[0].name, "Groceries");
}

#[test]
fn test_missing_file() {
    let result = read_transactions(&fixture_filename("no_such_file.csv"));
    assert!(matches!(result, Err(LoadError::FileNotFound(_))));
}

#[test]
fn test_missing_column_fails_load() {
    let result = read_transactions(&fixture_filename("missing_column.csv"));
    assert_eq!(result, Err(LoadError::MissingColumn("transaction_date".to_string())));
}

#[test]
fn test_unparseable_date_fails_load() {
    let result = read_transactions(&fixture_filename("bad_date.csv"));
    assert_eq!(result, Err(LoadError::InvalidDate("July 1 2024".to_string())));
}

#[test]
fn test_dataset_load_joins_and_deduplicates() {
    let dataset = Dataset::load(
        &fixture_filename("transactions.csv"),
        &fixture_filename("categories.csv"),
    )
    .unwrap();

    // Left join keeps every source row, dedup drops the repeated one
    assert_eq!(dataset.transactions.len(), 5);
    assert_eq!(dataset.deduplicated.len(), 4);

    assert_eq!(dataset.transactions[0].category_name.as_deref(), Some("Groceries"));
    assert_eq!(dataset.transactions[2].category_name, None);
    assert_eq!(dataset.transactions[3].category_name.as_deref(), Some("Eating Out"));

    assert_eq!(dataset.household_ids(), vec!["1000101", "1000202"]);
}

/// Return the path to a file within the test data directory
pub(crate) fn fixture_filename(filename: &str) -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("fixture");
    dir.push(filename);
    dir
}
