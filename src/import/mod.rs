mod csv_import;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::store::RecordStore;

pub use csv_import::{CsvImporter, ImportBatch};

/// Parse `path` and insert every usable row. Returns the number inserted.
/// A file that cannot be parsed inserts nothing.
pub fn import_csv_file(store: &mut RecordStore, path: &Path, today: NaiveDate) -> Result<usize> {
    let batch = CsvImporter::read_path(path, today)?;
    let count = store
        .import_expenses(batch.expenses)
        .context("Failed to store imported expenses")?;
    Ok(count)
}
