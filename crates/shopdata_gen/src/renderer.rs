//! CSV renderer for a generated dataset.
//!
//! Files are written into a staging directory first and moved into place
//! only after all five are complete. Files being replaced are parked in a
//! backup directory during the move and put back if any move fails, so a
//! failed run leaves the previous files in place.

use crate::error::RenderError;
use crate::model::Dataset;
use crate::schema::Schema;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const STAGING_DIR: &str = ".staging";
const BACKUP_DIR: &str = ".previous";

/// Statistics for one written file
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats {
    pub table: String,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Statistics from a render pass
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    pub files: Vec<FileStats>,
}

impl RenderStats {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

/// Writes the five entity tables as CSV files
pub struct CsvRenderer {
    schema: Schema,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRenderer {
    pub fn new() -> Self {
        Self {
            schema: Schema::ecommerce(),
        }
    }

    /// Write every table of `data` into `dir`
    pub fn write_all(&self, data: &Dataset, dir: &Path) -> Result<RenderStats, RenderError> {
        if dir.exists() && !dir.is_dir() {
            return Err(RenderError::NotADirectory(dir.display().to_string()));
        }
        let staging = dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let staged = match self.write_tables(data, &staging) {
            Ok(staged) => staged,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };

        let files = match publish(staged, dir) {
            Ok(files) => files,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };
        fs::remove_dir_all(&staging)?;

        Ok(RenderStats { files })
    }

    fn write_tables(&self, data: &Dataset, dir: &Path) -> Result<Vec<FileStats>, RenderError> {
        Ok(vec![
            self.write_table("customers", &data.customers, dir)?,
            self.write_table("products", &data.products, dir)?,
            self.write_table("orders", &data.orders, dir)?,
            self.write_table("order_items", &data.line_items, dir)?,
            self.write_table("reviews", &data.reviews, dir)?,
        ])
    }

    /// Write one table. The header comes from the schema so empty tables still
    /// get one.
    fn write_table<T: Serialize>(
        &self,
        table: &str,
        rows: &[T],
        dir: &Path,
    ) -> Result<FileStats, RenderError> {
        let (file_name, header) = match self.schema.find(table) {
            Some(t) => (t.file_name.clone(), t.column_names()),
            None => (format!("{}.csv", table), Vec::new()),
        };
        let path = dir.join(file_name);

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(&header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        drop(writer);

        let bytes = fs::metadata(&path)?.len();
        debug!(table, rows = rows.len(), bytes, "wrote csv");

        Ok(FileStats {
            table: table.to_string(),
            path,
            rows: rows.len(),
            bytes,
        })
    }
}

/// Move staged files into `dir`. On failure every file already moved is
/// removed and the files it replaced are restored.
fn publish(staged: Vec<FileStats>, dir: &Path) -> Result<Vec<FileStats>, RenderError> {
    let backup = dir.join(BACKUP_DIR);
    if backup.exists() {
        fs::remove_dir_all(&backup)?;
    }
    fs::create_dir_all(&backup)?;

    let mut moved: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    let mut published = Vec::with_capacity(staged.len());
    for mut file in staged {
        let name = file.path.file_name().unwrap_or_default().to_os_string();
        let target = dir.join(&name);
        match replace(&file.path, &target, &backup.join(&name)) {
            Ok(saved) => {
                moved.push((target.clone(), saved));
                file.path = target;
                published.push(file);
            }
            Err(e) => {
                restore(&moved);
                let _ = fs::remove_dir_all(&backup);
                return Err(e.into());
            }
        }
    }

    fs::remove_dir_all(&backup)?;
    Ok(published)
}

/// Rename `source` over `target`, parking an existing `target` at `saved`
fn replace(source: &Path, target: &Path, saved: &Path) -> io::Result<Option<PathBuf>> {
    let saved = if target.exists() {
        fs::rename(target, saved)?;
        Some(saved.to_path_buf())
    } else {
        None
    };
    if let Err(e) = fs::rename(source, target) {
        if let Some(ref saved) = saved {
            let _ = fs::rename(saved, target);
        }
        return Err(e);
    }
    Ok(saved)
}

fn restore(moved: &[(PathBuf, Option<PathBuf>)]) {
    for (target, saved) in moved.iter().rev() {
        let _ = fs::remove_file(target);
        if let Some(saved) = saved {
            let _ = fs::rename(saved, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Customer, Product, Review};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_data() -> Dataset {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        Dataset {
            customers: vec![Customer {
                id: 1,
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                location: "London, KY".to_string(),
                join_date: date,
            }],
            products: vec![Product {
                id: 1,
                name: "Coffee Maker dolor".to_string(),
                category: Category::HomeAndKitchen,
                price: 120.5,
                stock_quantity: 12,
            }],
            reviews: vec![Review {
                id: 1,
                product_id: 1,
                customer_id: 1,
                rating: 4,
                comment: "Said \"great\", then left.".to_string(),
                review_date: date,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_writes_five_files_with_headers() {
        let dir = TempDir::new().unwrap();
        let stats = CsvRenderer::new()
            .write_all(&sample_data(), dir.path())
            .unwrap();

        assert_eq!(stats.files.len(), 5);
        assert_eq!(stats.total_rows(), 3);

        let orders = fs::read_to_string(dir.path().join("orders.csv")).unwrap();
        assert_eq!(
            orders.trim_end(),
            "order_id,customer_id,order_date,total_amount,status"
        );
        assert!(!dir.path().join(STAGING_DIR).exists());
    }

    #[test]
    fn test_row_formatting() {
        let dir = TempDir::new().unwrap();
        CsvRenderer::new()
            .write_all(&sample_data(), dir.path())
            .unwrap();

        let customers = fs::read_to_string(dir.path().join("customers.csv")).unwrap();
        let mut lines = customers.lines();
        assert_eq!(
            lines.next(),
            Some("customer_id,name,email,location,join_date")
        );
        assert_eq!(
            lines.next(),
            Some("1,Ada Lovelace,ada@example.com,\"London, KY\",2024-05-17")
        );

        let products = fs::read_to_string(dir.path().join("products.csv")).unwrap();
        assert!(products.contains("1,Coffee Maker dolor,Home & Kitchen,120.5,12"));

        let reviews = fs::read_to_string(dir.path().join("reviews.csv")).unwrap();
        assert!(reviews.contains("\"Said \"\"great\"\", then left.\""));
    }

    #[test]
    fn test_rejects_file_as_output_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        let result = CsvRenderer::new().write_all(&sample_data(), &file);
        assert!(matches!(result, Err(RenderError::NotADirectory(_))));
    }

    #[test]
    fn test_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("customers.csv"), "stale").unwrap();

        CsvRenderer::new()
            .write_all(&sample_data(), dir.path())
            .unwrap();
        let customers = fs::read_to_string(dir.path().join("customers.csv")).unwrap();
        assert!(customers.starts_with("customer_id,"));
    }

    #[test]
    fn test_failed_move_restores_previous_files() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join(STAGING_DIR);
        fs::create_dir_all(&staging).unwrap();
        for table in ["customers", "products", "orders"] {
            fs::write(dir.path().join(format!("{}.csv", table)), format!("old {}", table)).unwrap();
        }
        fs::write(staging.join("customers.csv"), "new customers").unwrap();
        fs::write(staging.join("products.csv"), "new products").unwrap();

        // orders.csv never made it into staging, so the third move fails
        let staged: Vec<FileStats> = ["customers", "products", "orders"]
            .iter()
            .map(|table| FileStats {
                table: table.to_string(),
                path: staging.join(format!("{}.csv", table)),
                rows: 0,
                bytes: 0,
            })
            .collect();

        assert!(publish(staged, dir.path()).is_err());
        for table in ["customers", "products", "orders"] {
            let content = fs::read_to_string(dir.path().join(format!("{}.csv", table))).unwrap();
            assert_eq!(content, format!("old {}", table));
        }
        assert!(!dir.path().join(BACKUP_DIR).exists());
    }
}
