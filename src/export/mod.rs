//! CSV report writer for a filtered expense list.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

use crate::models::{Expense, Month};

const HEADER: [&str; 4] = ["Date", "Description", "Category", "Amount"];

/// `SpendIQ_Report_January 2026.csv` for 2026-01.
pub fn report_file_name(month: Month) -> String {
    format!("SpendIQ_Report_{}.csv", month.long_label())
}

/// Write one row per expense in the given order, followed by a TOTAL row.
pub fn write_csv<W: Write>(writer: W, expenses: &[Expense], total: Decimal) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)
        .context("Failed to write CSV header")?;

    for expense in expenses {
        wtr.write_record([
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            expense.category.to_string(),
            money(expense.amount),
        ])
        .with_context(|| format!("Failed to write expense {}", expense.id))?;
    }

    wtr.write_record(["", "TOTAL", "", &money(total)])
        .context("Failed to write CSV total")?;
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn export_csv_file(path: &Path, expenses: &[Expense], total: Decimal) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, expenses, total)?;
    tracing::info!(rows = expenses.len(), path = %path.display(), "exported CSV report");
    Ok(())
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
