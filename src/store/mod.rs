//! DuckDB-backed store for the generated CSV files.
//!
//! The store recreates the five tables, imports the CSV files produced by the
//! generator and answers the verification and analysis queries.
//!
//! # Example
//!
//! ```ignore
//! use shopdata::store::Store;
//! use std::path::Path;
//!
//! let mut store = Store::open(Path::new("ecommerce.duckdb")).unwrap();
//! let stats = store.load_dir(Path::new("data"), false).unwrap();
//! println!("{}", stats);
//! ```

mod loader;
mod output;

pub use loader::CsvLoader;
pub use output::{format_money, OutputFormat, QueryResultFormatter};

use anyhow::{Context, Result};
use duckdb::Connection;
use shopdata_gen::Schema;
use std::path::Path;
use tracing::debug;

/// Import statistics for one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableImport {
    pub table: String,
    /// Records found in the CSV file
    pub rows_read: u64,
    /// Rows present in the table after the import
    pub rows_inserted: u64,
}

/// Statistics from a CSV import
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub tables: Vec<TableImport>,
    /// Import duration in seconds
    pub duration_secs: f64,
}

impl ImportStats {
    pub fn rows_inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_inserted).sum()
    }
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tables, {} rows imported in {:.2}s",
            self.tables.len(),
            self.rows_inserted(),
            self.duration_secs
        )
    }
}

/// Result of a query rendered as strings, ready for formatting
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Post-import summary
#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    /// Row count per table, in dependency order
    pub table_counts: Vec<(String, i64)>,
    pub total_revenue: f64,
    pub average_order_value: Option<f64>,
    pub total_products_sold: i64,
    /// `None` when there are no reviews
    pub average_rating: Option<f64>,
    /// Orders per status, most frequent first
    pub orders_by_status: Vec<(String, i64)>,
}

/// The relational store wrapping a DuckDB connection
pub struct Store {
    conn: Connection,
    schema: Schema,
}

impl Store {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DuckDB database: {}", path.display()))?;
        debug!(path = %path.display(), "opened database");
        Ok(Self::with_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to create in-memory DuckDB database")?;
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn,
            schema: Schema::ecommerce(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop and recreate all tables
    pub fn create_tables(&self) -> Result<()> {
        create_tables(&self.conn, &self.schema)
    }

    /// Recreate the tables and import every CSV file from `dir`.
    ///
    /// Runs in one transaction: any failure leaves the database as it was.
    pub fn load_dir(&mut self, dir: &Path, progress: bool) -> Result<ImportStats> {
        let start = std::time::Instant::now();
        let tx = self
            .conn
            .transaction()
            .context("Failed to start import transaction")?;

        create_tables(&tx, &self.schema)?;
        let loader = CsvLoader::new(&tx, &self.schema);
        let tables = loader.load_dir(dir, progress)?;

        tx.commit().context("Failed to commit import")?;

        Ok(ImportStats {
            tables,
            duration_secs: start.elapsed().as_secs_f64(),
        })
    }

    pub fn count_rows(&self, table: &str) -> Result<i64> {
        count_rows(&self.conn, table)
    }

    /// Counts, revenue, order value, units sold, rating and status breakdown
    pub fn verify(&self) -> Result<VerifySummary> {
        let mut table_counts = Vec::with_capacity(self.schema.tables.len());
        for table in self.schema.tables_in_order() {
            table_counts.push((table.name.clone(), self.count_rows(&table.name)?));
        }

        let total_revenue: f64 = self.scalar("SELECT COALESCE(SUM(total_amount), 0) FROM orders")?;
        let average_order_value: Option<f64> =
            self.scalar("SELECT AVG(total_amount) FROM orders")?;
        let total_products_sold: i64 =
            self.scalar("SELECT CAST(COALESCE(SUM(quantity), 0) AS BIGINT) FROM order_items")?;
        let average_rating: Option<f64> = self.scalar("SELECT AVG(rating) FROM reviews")?;

        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY count DESC, status",
        )?;
        let orders_by_status = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<duckdb::Result<Vec<_>>>()
            .context("Failed to group orders by status")?;

        Ok(VerifySummary {
            table_counts,
            total_revenue,
            average_order_value,
            total_products_sold,
            average_rating,
            orders_by_status,
        })
    }

    fn scalar<T: duckdb::types::FromSql>(&self, sql: &str) -> Result<T> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to execute query: {}", sql))
    }
}

fn create_tables(conn: &Connection, schema: &Schema) -> Result<()> {
    let ordered = schema.tables_in_order();
    for table in ordered.iter().rev() {
        conn.execute_batch(&table.drop_table_sql())
            .with_context(|| format!("Failed to drop table {}", table.name))?;
    }
    for table in &ordered {
        conn.execute_batch(&table.create_table_sql())
            .with_context(|| format!("Failed to create table {}", table.name))?;
        debug!(table = %table.name, "created table");
    }
    Ok(())
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .with_context(|| format!("Failed to count rows in {}", table))
}
