use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::models::{validate_amount, Category, NewExpense};

/// Normalized candidates from one file, plus how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub expenses: Vec<NewExpense>,
    pub skipped: usize,
}

/// Header positions, matched case-insensitively. Only `amount` is mandatory.
#[derive(Debug, Clone, Copy)]
struct Columns {
    amount: usize,
    category: Option<usize>,
    description: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let amount = find("amount").context("CSV file has no 'amount' column")?;
        Ok(Self {
            amount,
            category: find("category"),
            description: find("description"),
            date: find("date"),
        })
    }
}

pub struct CsvImporter;

impl CsvImporter {
    pub fn read_path(path: &Path, today: NaiveDate) -> Result<ImportBatch> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::read(file, today)
    }

    /// Parse a whole CSV document. Malformed input fails before any row is
    /// returned; individual rows with an unusable amount or date are skipped.
    pub fn read<R: io::Read>(reader: R, today: NaiveDate) -> Result<ImportBatch> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers().context("Failed to read CSV header")?.clone();
        if headers.is_empty() {
            anyhow::bail!("CSV file is empty");
        }
        let columns = Columns::locate(&headers)?;

        let mut records = Vec::new();
        for result in rdr.records() {
            records.push(result.context("Failed to read CSV record")?);
        }

        let mut batch = ImportBatch::default();
        for (i, record) in records.iter().enumerate() {
            match normalize_row(record, columns, today) {
                Ok(expense) => batch.expenses.push(expense),
                Err(reason) => {
                    tracing::warn!(row = i + 2, %reason, "skipping CSV row");
                    batch.skipped += 1;
                }
            }
        }

        tracing::info!(
            kept = batch.expenses.len(),
            skipped = batch.skipped,
            "parsed CSV import"
        );
        Ok(batch)
    }
}

fn field(record: &csv::StringRecord, column: Option<usize>) -> &str {
    column
        .and_then(|c| record.get(c))
        .map(str::trim)
        .unwrap_or("")
}

fn normalize_row(
    record: &csv::StringRecord,
    columns: Columns,
    today: NaiveDate,
) -> Result<NewExpense> {
    let raw_amount = field(record, Some(columns.amount));
    if raw_amount.is_empty() {
        anyhow::bail!("missing amount");
    }
    let amount = parse_decimal(raw_amount)?;
    validate_amount(amount)?;

    let raw_date = field(record, columns.date);
    let date = if raw_date.is_empty() {
        today
    } else {
        parse_date(raw_date)?
    };

    let category = Category::normalize(field(record, columns.category));
    let description = field(record, columns.description);
    Ok(NewExpense::new(amount, category, date).with_description(description))
}

/// Two-digit-year layouts come first. `%Y` also accepts a short year, so
/// `%Y` matches below year 1000 are discarded as well.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
];

fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if !(fmt.contains("%Y") && d.year() < 1000) {
                return Ok(d);
            }
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', '₹', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Failed to parse '{}' as decimal", s))
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
