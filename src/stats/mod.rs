use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::transaction::Transaction;

/// Transaction history span of one household, computed over the deduplicated
/// set. `avg_txns_per_day` is absent when the span is a single day; a zero
/// duration has no meaningful daily rate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HouseholdSpan {
    pub(crate) household_id: String,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) duration_days: i64,
    pub(crate) unique_transactions: usize,
    pub(crate) avg_txns_per_day: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HouseholdCoverage {
    pub(crate) household_id: String,
    pub(crate) percent_categorised: f32,
}

pub(crate) fn household_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .map(|t| t.household_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Unique transaction count per household, ordered by household id.
pub(crate) fn transaction_counts(deduplicated: &[Transaction]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for t in deduplicated {
        *counts.entry(t.household_id.as_str()).or_insert(0) += 1;
    }
    counts.into_iter().map(|(id, n)| (id.to_string(), n)).collect()
}

/// First/last transaction dates and daily transaction rate per household,
/// ordered by household id. Households with no rows simply do not appear.
pub(crate) fn household_spans(deduplicated: &[Transaction]) -> Vec<HouseholdSpan> {
    let mut by_household: BTreeMap<&str, (NaiveDate, NaiveDate, usize)> = BTreeMap::new();
    for t in deduplicated {
        let entry = by_household
            .entry(t.household_id.as_str())
            .or_insert((t.date, t.date, 0));
        entry.0 = entry.0.min(t.date);
        entry.1 = entry.1.max(t.date);
        entry.2 += 1;
    }

    by_household
        .into_iter()
        .map(|(household_id, (start_date, end_date, unique_transactions))| {
            let duration_days = (end_date - start_date).num_days();
            let avg_txns_per_day = if duration_days == 0 {
                None
            } else {
                Some(unique_transactions as f32 / duration_days as f32)
            };
            HouseholdSpan {
                household_id: household_id.to_string(),
                start_date,
                end_date,
                duration_days,
                unique_transactions,
                avg_txns_per_day,
            }
        })
        .collect()
}

/// Percentage of deduplicated transactions carrying a category name, over all
/// households combined. Weighted by transaction volume, deliberately not the
/// mean of the per-household percentages.
pub(crate) fn overall_coverage(deduplicated: &[Transaction]) -> f32 {
    if deduplicated.is_empty() {
        return 0.0;
    }
    let categorised = deduplicated.iter().filter(|t| t.is_categorised()).count();
    100.0 * categorised as f32 / deduplicated.len() as f32
}

/// Per-household categorisation coverage, sorted ascending by percentage so
/// the least-covered households come first. Ties break by household id.
pub(crate) fn household_coverage(deduplicated: &[Transaction]) -> Vec<HouseholdCoverage> {
    let mut by_household: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for t in deduplicated {
        let entry = by_household.entry(t.household_id.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if t.is_categorised() {
            entry.1 += 1;
        }
    }

    let mut coverage: Vec<HouseholdCoverage> = by_household
        .into_iter()
        .map(|(household_id, (total, categorised))| HouseholdCoverage {
            household_id: household_id.to_string(),
            percent_categorised: 100.0 * categorised as f32 / total as f32,
        })
        .collect();

    coverage.sort_by(|a, b| {
        a.percent_categorised
            .total_cmp(&b.percent_categorised)
            .then_with(|| a.household_id.cmp(&b.household_id))
    });
    coverage
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::transaction::Transaction;

    fn txn(household: &str, description: &str, day: u32, category: Option<&str>) -> Transaction {
        Transaction {
            household_id: household.to_string(),
            description: description.to_string(),
            amount: -10.0,
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            category_id: category.map(|_| "1".to_string()),
            category_name: category.map(str::to_string),
        }
    }

    #[test]
    fn span_over_multiple_days() {
        let spans = household_spans(&[
            txn("h1", "A", 1, None),
            txn("h1", "B", 11, None),
            txn("h1", "C", 6, None),
        ]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(spans[0].end_date, NaiveDate::from_ymd_opt(2024, 7, 11).unwrap());
        assert_eq!(spans[0].duration_days, 10);
        assert_eq!(spans[0].unique_transactions, 3);
        assert_eq!(spans[0].avg_txns_per_day, Some(0.3));
    }

    #[test]
    fn single_day_span_has_no_daily_rate() {
        let spans = household_spans(&[txn("h1", "A", 1, None), txn("h1", "B", 1, None)]);
        assert_eq!(spans[0].duration_days, 0);
        assert_eq!(spans[0].avg_txns_per_day, None);
    }

    #[test]
    fn overall_coverage_weights_by_volume() {
        // One fully covered household with 1 transaction, one uncovered with 99.
        let mut transactions = vec![txn("a", "X", 1, Some("Groceries"))];
        for i in 0..99 {
            transactions.push(txn("b", &format!("T{}", i), 1, None));
        }
        assert_eq!(overall_coverage(&transactions), 1.0);
    }

    #[test]
    fn overall_coverage_of_empty_set_is_zero() {
        assert_eq!(overall_coverage(&[]), 0.0);
    }

    #[test]
    fn household_coverage_sorted_ascending() {
        let coverage = household_coverage(&[
            txn("h1", "A", 1, Some("Groceries")),
            txn("h1", "B", 2, Some("Groceries")),
            txn("h2", "C", 1, None),
            txn("h2", "D", 2, Some("Travel")),
            txn("h3", "E", 1, None),
        ]);
        let ids: Vec<&str> = coverage.iter().map(|c| c.household_id.as_str()).collect();
        assert_eq!(ids, vec!["h3", "h2", "h1"]);
        assert_eq!(coverage[0].percent_categorised, 0.0);
        assert_eq!(coverage[1].percent_categorised, 50.0);
        assert_eq!(coverage[2].percent_categorised, 100.0);
    }

    #[test]
    fn counts_group_by_household() {
        let counts = transaction_counts(&[
            txn("h2", "A", 1, None),
            txn("h1", "B", 1, None),
            txn("h2", "C", 2, None),
        ]);
        assert_eq!(counts, vec![("h1".to_string(), 1), ("h2".to_string(), 2)]);
        assert_eq!(household_count(&[txn("h2", "A", 1, None), txn("h1", "B", 1, None)]), 2);
    }
}
