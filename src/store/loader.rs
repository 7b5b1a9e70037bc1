//! CSV loader for importing generated files into DuckDB.

use super::{count_rows, TableImport};
use anyhow::{bail, Context, Result};
use duckdb::Connection;
use indicatif::{ProgressBar, ProgressStyle};
use shopdata_gen::{Schema, Table};
use std::path::Path;
use tracing::debug;

/// Loads the CSV files of one dataset into DuckDB
pub struct CsvLoader<'a> {
    conn: &'a Connection,
    schema: &'a Schema,
}

impl<'a> CsvLoader<'a> {
    pub fn new(conn: &'a Connection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Import every table from `dir`, parents before children.
    ///
    /// Stops at the first failing table; the caller owns the transaction.
    pub fn load_dir(&self, dir: &Path, progress: bool) -> Result<Vec<TableImport>> {
        let tables = self.schema.tables_in_order();

        let progress_bar = if progress {
            let pb = ProgressBar::new(tables.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut imports = Vec::with_capacity(tables.len());
        for table in tables {
            if let Some(ref pb) = progress_bar {
                pb.set_message(table.name.clone());
            }
            let import = self.load_table(table, &dir.join(&table.file_name))?;
            imports.push(import);
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Import complete");
        }
        Ok(imports)
    }

    /// Import one CSV file into its table
    pub fn load_table(&self, table: &Table, path: &Path) -> Result<TableImport> {
        if !path.exists() {
            bail!("CSV file '{}' not found", path.display());
        }
        if std::fs::metadata(path)?.len() == 0 {
            bail!("CSV file '{}' is empty", path.display());
        }

        let rows_read = count_records(table, path)?;

        let sql = format!(
            "COPY {} FROM '{}' (FORMAT csv, HEADER true)",
            table.name,
            escape_sql_string(&path.display().to_string())
        );
        self.conn
            .execute_batch(&sql)
            .with_context(|| format!("Failed to insert data into '{}'", table.name))?;

        let rows_inserted = count_rows(self.conn, &table.name)? as u64;
        if rows_inserted != rows_read {
            bail!(
                "Table '{}' holds {} rows but '{}' has {} records",
                table.name,
                rows_inserted,
                path.display(),
                rows_read
            );
        }
        debug!(table = %table.name, rows = rows_inserted, "imported csv");

        Ok(TableImport {
            table: table.name.clone(),
            rows_read,
            rows_inserted,
        })
    }
}

/// Count data records, checking the header against the table's columns
fn count_records(table: &Table, path: &Path) -> Result<u64> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Error parsing CSV file '{}'", path.display()))?;
    let expected = table.column_names();
    if headers.iter().collect::<Vec<_>>() != expected {
        bail!(
            "CSV file '{}' has columns [{}], expected [{}]",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", "),
            expected.join(", ")
        );
    }

    let mut count = 0;
    for record in reader.records() {
        record.with_context(|| format!("Error parsing CSV file '{}'", path.display()))?;
        count += 1;
    }
    Ok(count)
}

fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("/tmp/data"), "/tmp/data");
        assert_eq!(escape_sql_string("/tmp/o'brien"), "/tmp/o''brien");
    }
}
