use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Table, TableComponent};

use crate::command::{self, Statement};
use crate::dataset::Dataset;
use crate::explorer;
use crate::ngram;
use crate::stats;

/// Parse one statement and print its result against the loaded snapshot.
/// All recomputation is synchronous and derived from the snapshot alone.
pub(crate) fn parse_and_run(dataset: &Dataset, line: &str) -> Result<(), String> {
    let statement = command::parse(line)?;
    match statement {
        Statement::Overview => run_overview(dataset),
        Statement::Span => run_span(dataset),
        Statement::Coverage => run_coverage(dataset),
        Statement::Ngrams(n) => run_ngrams(dataset, n),
        Statement::Accuracy { household_id, shuffle } => run_accuracy(dataset, &household_id, shuffle)?,
        Statement::Households => run_households(dataset),
        Statement::Help => print_help(),
    }
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

fn run_overview(dataset: &Dataset) {
    println!(
        "Total households: {}   Unique transactions: {}",
        stats::household_count(&dataset.transactions),
        dataset.deduplicated.len()
    );

    let mut table = new_table();
    table.set_header(vec!["Household ID", "Unique Transactions"]);
    for (household_id, count) in stats::transaction_counts(&dataset.deduplicated) {
        table.add_row(vec![
            Cell::new(household_id.as_str()),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn run_span(dataset: &Dataset) {
    let mut table = new_table();
    table.set_header(vec![
        "Household ID",
        "First Transaction",
        "Last Transaction",
        "Duration (days)",
        "Unique Transactions",
        "Avg Transactions/Day",
    ]);
    for span in stats::household_spans(&dataset.deduplicated) {
        let avg = match span.avg_txns_per_day {
            Some(avg) => format!("{avg:.1}"),
            // Zero-duration span, rate is undefined rather than zero
            None => "n/a".to_string(),
        };
        table.add_row(vec![
            Cell::new(span.household_id.as_str()),
            Cell::new(format_date(span.start_date).as_str()),
            Cell::new(format_date(span.end_date).as_str()),
            Cell::new(span.duration_days).set_alignment(CellAlignment::Right),
            Cell::new(span.unique_transactions).set_alignment(CellAlignment::Right),
            Cell::new(avg.as_str()).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn run_coverage(dataset: &Dataset) {
    println!("Overall coverage: {:.2}%", stats::overall_coverage(&dataset.deduplicated));

    let mut table = new_table();
    table.set_header(vec!["Household ID", "% Categorised"]);
    for coverage in stats::household_coverage(&dataset.deduplicated) {
        table.add_row(vec![
            Cell::new(coverage.household_id.as_str()),
            Cell::new(format!("{:.1}", coverage.percent_categorised).as_str())
                .set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn run_ngrams(dataset: &Dataset, n: usize) {
    let ranked = ngram::uncategorised_ngrams(&dataset.deduplicated, n);
    if ranked.is_empty() {
        println!("No uncategorised transactions.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![format!("{n}-gram"), "Frequency".to_string()]);
    for entry in ranked {
        table.add_row(vec![
            Cell::new(entry.ngram.as_str()),
            Cell::new(entry.frequency).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn run_accuracy(dataset: &Dataset, household_id: &str, shuffle: bool) -> Result<(), String> {
    if !dataset.household_ids().iter().any(|id| id == household_id) {
        return Err(format!("unknown household '{}', try 'households'", household_id));
    }

    let mut rows = explorer::categorised_for_household(&dataset.deduplicated, household_id);
    if shuffle {
        explorer::shuffle(&mut rows);
    }

    let mut table = new_table();
    table.set_header(vec!["Description", "Category"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.description.as_str()),
            Cell::new(row.category_name.as_str()),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn run_households(dataset: &Dataset) {
    let mut table = new_table();
    table.set_header(vec!["Household ID"]);
    for household_id in dataset.household_ids() {
        table.add_row(vec![Cell::new(household_id.as_str())]);
    }
    println!("{table}");
}

fn print_help() {
    println!("Statements (terminate with ';'):");
    println!("  overview                      household and unique transaction counts");
    println!("  span                          transaction history span per household");
    println!("  coverage                      categorisation coverage, least covered first");
    println!("  ngrams <1|2|3>                common patterns in uncategorised descriptions");
    println!("  accuracy <household> [shuffle] eyeball categorisation of one household");
    println!("  households                    list known household ids");
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
