use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::info;

use crate::csv_reader::{self, LoadError, TransactionRow};
use crate::transaction::{Category, Transaction};

/// Immutable in-memory snapshot of the joined dataset, built once at startup
/// and passed by reference to all consumers. A fresh process re-reads the
/// source files; there is no invalidation.
#[derive(Debug)]
pub(crate) struct Dataset {
    /// All joined rows in load order, duplicates retained.
    pub(crate) transactions: Vec<Transaction>,
    /// First-occurrence view keyed by (household, description, amount, date).
    pub(crate) deduplicated: Vec<Transaction>,
}

impl Dataset {
    pub(crate) fn load(transactions_path: &Path, categories_path: &Path) -> Result<Dataset, LoadError> {
        let rows = csv_reader::read_transactions(transactions_path)?;
        let categories = csv_reader::read_categories(categories_path)?;

        let transactions = join_categories(rows, &categories);
        let deduplicated = deduplicate(&transactions);
        info!(
            "Loaded {} transactions ({} unique) across {} category references",
            transactions.len(),
            deduplicated.len(),
            categories.len()
        );

        Ok(Dataset { transactions, deduplicated })
    }

    /// Known household ids, in order of first appearance in the source file.
    pub(crate) fn household_ids(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ids = vec![];
        for t in &self.transactions {
            if seen.insert(t.household_id.as_str()) {
                ids.push(t.household_id.clone());
            }
        }
        ids
    }
}

/// Left-join transactions to category references on (household_id, category_id).
/// Every transaction keeps a row; the category name stays absent when no
/// reference matches.
fn join_categories(rows: Vec<TransactionRow>, categories: &[Category]) -> Vec<Transaction> {
    let mut name_by_key: HashMap<(&str, &str), &str> = HashMap::new();
    for c in categories {
        name_by_key.insert((c.household_id.as_str(), c.category_id.as_str()), c.name.as_str());
    }

    rows.into_iter()
        .map(|row| {
            let category_name = row.categorized_as.as_deref().and_then(|id| {
                name_by_key
                    .get(&(row.household_id.as_str(), id))
                    .map(|name| name.to_string())
            });
            Transaction {
                household_id: row.household_id,
                description: row.description,
                amount: row.amount,
                date: row.date,
                category_id: row.categorized_as,
                category_name,
            }
        })
        .collect()
}

/// Remove duplicate transactions by natural key. First occurrence wins and
/// load order is preserved. Idempotent.
pub(crate) fn deduplicate(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .filter(|t| seen.insert(t.dedup_key()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{deduplicate, join_categories};
    use crate::csv_reader::TransactionRow;
    use crate::transaction::{Category, Transaction};

    fn row(household: &str, description: &str, amount: f32, day: u32, categorized_as: Option<&str>) -> TransactionRow {
        TransactionRow {
            household_id: household.to_string(),
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            categorized_as: categorized_as.map(str::to_string),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                household_id: "h1".to_string(),
                category_id: "42".to_string(),
                name: "Groceries".to_string(),
            },
            Category {
                household_id: "h2".to_string(),
                category_id: "42".to_string(),
                name: "Travel".to_string(),
            },
        ]
    }

    #[test]
    fn join_resolves_names_per_household() {
        let joined = join_categories(
            vec![row("h1", "WOOLWORTHS", -32.5, 1, Some("42")), row("h2", "QANTAS", -250.0, 2, Some("42"))],
            &categories(),
        );
        assert_eq!(joined[0].category_name.as_deref(), Some("Groceries"));
        assert_eq!(joined[1].category_name.as_deref(), Some("Travel"));
    }

    #[test]
    fn join_is_left_and_preserves_row_count() {
        let rows = vec![
            row("h1", "WOOLWORTHS", -32.5, 1, Some("42")),
            row("h1", "UNKNOWN MERCHANT", -5.0, 2, Some("999")),
            row("h1", "ATM WITHDRAWAL", -100.0, 3, None),
        ];
        let joined = join_categories(rows, &categories());
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[1].category_name, None);
        assert_eq!(joined[2].category_name, None);
    }

    fn txn(household: &str, description: &str, amount: f32, day: u32) -> Transaction {
        Transaction {
            household_id: household.to_string(),
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            category_id: None,
            category_name: None,
        }
    }

    #[test]
    fn deduplicate_first_occurrence_wins() {
        let mut first = txn("h1", "COFFEE SHOP", -4.5, 1);
        first.category_name = Some("Eating Out".to_string());
        let duplicate = txn("h1", "COFFEE SHOP", -4.5, 1);

        let deduplicated = deduplicate(&[first.clone(), duplicate, txn("h1", "COFFEE SHOP", -4.5, 2)]);
        assert_eq!(deduplicated.len(), 2);
        assert_eq!(deduplicated[0], first);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let transactions = vec![
            txn("h1", "COFFEE SHOP", -4.5, 1),
            txn("h1", "COFFEE SHOP", -4.5, 1),
            txn("h2", "COFFEE SHOP", -4.5, 1),
        ];
        let once = deduplicate(&transactions);
        let twice = deduplicate(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
