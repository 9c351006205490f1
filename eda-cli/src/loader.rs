//! CSV loading
//!
//! Reads a headed CSV file into an [`eda_stats::Table`]. A column is
//! numeric when every non-empty cell parses as a float; otherwise it is
//! categorical. Empty cells become missing values (NaN / None).

use anyhow::{Context, Result};
use eda_stats::{Column, Table};
use std::path::Path;

/// Load a CSV file (with a header row) into a table
pub fn load_csv(path: &Path) -> Result<Table> {
    log::info!("Loading CSV file: {:?}", path);

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {:?}", path))?;

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record at row {}", row + 2))?;
        for (i, cell) in record.iter().enumerate() {
            if i < cells.len() {
                cells[i].push(cell.trim().to_string());
            }
        }
    }

    let mut table = Table::new();
    for (header, values) in headers.into_iter().zip(cells) {
        table.push_column(header, infer_column(values));
    }

    log::info!("CSV loaded: {} columns", table.n_columns());
    Ok(table)
}

/// Numeric if every non-empty cell parses as f64 (and at least one does)
fn infer_column(values: Vec<String>) -> Column {
    let parsed: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            if v.is_empty() {
                None
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();

    let non_empty = values.iter().filter(|v| !v.is_empty()).count();
    let numeric = parsed.iter().filter(|p| p.is_some()).count();

    if non_empty > 0 && numeric == non_empty {
        Column::Numeric(
            parsed
                .into_iter()
                .map(|p| p.unwrap_or(f64::NAN))
                .collect(),
        )
    } else {
        Column::Categorical(
            values
                .into_iter()
                .map(|v| if v.is_empty() { None } else { Some(v) })
                .collect(),
        )
    }
}
