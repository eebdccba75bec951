use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::transaction::Category;

#[cfg(test)]
mod tests;

/// A transaction row as read from the transactions file, before the category
/// reference data has been joined on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionRow {
    pub(crate) household_id: String,
    pub(crate) description: String,
    pub(crate) amount: f32,
    pub(crate) date: NaiveDate,
    /// The `categorized_as` column; empty values read as absent.
    pub(crate) categorized_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    FileNotFound(String),
    InvalidFile(String),
    MissingColumn(String),
    InvalidDate(String),
    InvalidAmount(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::FileNotFound(s) => write!(f, "file not found: {}", s),
            LoadError::InvalidFile(s) => write!(f, "unreadable csv file: {}", s),
            LoadError::MissingColumn(s) => write!(f, "missing required column '{}'", s),
            LoadError::InvalidDate(s) => write!(f, "unparseable transaction date '{}'", s),
            LoadError::InvalidAmount(s) => write!(f, "unparseable transaction amount '{}'", s),
        }
    }
}

impl std::error::Error for LoadError {}

struct TransactionHeaderIndex {
    household_id: usize,
    description: usize,
    amount: usize,
    date: usize,
    categorized_as: usize,
}

struct CategoryHeaderIndex {
    household_id: usize,
    category_id: usize,
    name: usize,
}

/// Read the transactions file. Any malformed row fails the whole load, there
/// is no row-skip recovery.
pub(crate) fn read_transactions(file_path: &Path) -> Result<Vec<TransactionRow>, LoadError> {
    let mut rdr = open_csv(file_path)?;
    let header_index = parse_transaction_headers(headers(&mut rdr, file_path)?)?;

    info!("Reading transactions from {:?}", file_path);
    let mut rows: Vec<TransactionRow> = vec![];
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::InvalidFile(e.to_string()))?;
        rows.push(TransactionRow {
            household_id: field(&record, header_index.household_id).to_string(),
            description: field(&record, header_index.description).to_string(),
            amount: parse_amount(field(&record, header_index.amount))?,
            date: parse_date(field(&record, header_index.date))?,
            categorized_as: match field(&record, header_index.categorized_as) {
                "" => None,
                s => Some(s.to_string()),
            },
        });
    }
    info!("Read {} transaction rows", rows.len());

    Ok(rows)
}

/// Read the category reference file.
pub(crate) fn read_categories(file_path: &Path) -> Result<Vec<Category>, LoadError> {
    let mut rdr = open_csv(file_path)?;
    let header_index = parse_category_headers(headers(&mut rdr, file_path)?)?;

    info!("Reading category references from {:?}", file_path);
    let mut categories: Vec<Category> = vec![];
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::InvalidFile(e.to_string()))?;
        categories.push(Category {
            household_id: field(&record, header_index.household_id).to_string(),
            category_id: field(&record, header_index.category_id).to_string(),
            name: field(&record, header_index.name).to_string(),
        });
    }

    Ok(categories)
}

fn open_csv(file_path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    if !file_path.exists() {
        return Err(LoadError::FileNotFound(file_path.display().to_string()));
    }
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(file_path)
        .map_err(|e| LoadError::InvalidFile(e.to_string()))
}

fn headers<'r>(
    rdr: &'r mut csv::Reader<std::fs::File>,
    file_path: &Path,
) -> Result<&'r StringRecord, LoadError> {
    rdr.headers()
        .map_err(|_| LoadError::InvalidFile(file_path.display().to_string()))
}

fn parse_transaction_headers(headers: &StringRecord) -> Result<TransactionHeaderIndex, LoadError> {
    Ok(TransactionHeaderIndex {
        household_id: column_index(headers, "household_id")?,
        description: column_index(headers, "transaction_original_description")?,
        amount: column_index(headers, "transaction_amount")?,
        date: column_index(headers, "transaction_date")?,
        categorized_as: column_index(headers, "categorized_as")?,
    })
}

fn parse_category_headers(headers: &StringRecord) -> Result<CategoryHeaderIndex, LoadError> {
    let name = match column_index(headers, "system_category_name") {
        Ok(i) => i,
        // Accept any other category-name column spelling
        Err(_) => {
            let category_name = Regex::new(r"(?i)category_name").unwrap();
            headers
                .iter()
                .position(|s| category_name.is_match(s))
                .ok_or_else(|| LoadError::MissingColumn("system_category_name".to_string()))?
        }
    };

    Ok(CategoryHeaderIndex {
        household_id: column_index(headers, "household_id")?,
        category_id: column_index(headers, "category_id")?,
        name,
    })
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|s| s.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("").trim()
}

lazy_static! {
    static ref YMD: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref YMD_HMS: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").unwrap();
    static ref DMY: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// Parse a transaction date, tolerating a time-of-day component which is
/// discarded. Any other shape is a hard error.
fn parse_date(s: &str) -> Result<NaiveDate, LoadError> {
    if YMD.is_match(s) {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LoadError::InvalidDate(s.to_string()))
    } else if YMD_HMS.is_match(s) {
        let sep = if s.as_bytes()[10] == b'T' { "T" } else { " " };
        let format = format!("%Y-%m-%d{}%H:%M:%S", sep);
        NaiveDateTime::parse_from_str(&s[0..19], &format)
            .map(|dt| dt.date())
            .map_err(|_| LoadError::InvalidDate(s.to_string()))
    } else if DMY.is_match(s) {
        NaiveDate::parse_from_str(s, "%d/%m/%Y").map_err(|_| LoadError::InvalidDate(s.to_string()))
    } else {
        Err(LoadError::InvalidDate(s.to_string()))
    }
}

fn parse_amount(s: &str) -> Result<f32, LoadError> {
    let cleaned = s.replace(['$', ','], "");
    cleaned
        .trim()
        .parse::<f32>()
        .map_err(|_| LoadError::InvalidAmount(s.to_string()))
}
