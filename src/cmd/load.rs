use crate::config::{DEFAULT_DATABASE, DEFAULT_OUTPUT_DIR};
use crate::store::{format_money, ImportStats, Store, VerifySummary};
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  shopdata load
  shopdata load --input-dir data --database ecommerce.duckdb --progress")]
pub struct LoadArgs {
    /// Directory holding the generated CSV files
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub input_dir: PathBuf,

    /// DuckDB database file (recreated tables)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Show import progress
    #[arg(short, long)]
    pub progress: bool,
}

pub fn run(args: LoadArgs) -> Result<()> {
    load_and_verify(&args.input_dir, &args.database, args.progress)
}

/// Import `input_dir` into `database` and print the verification summary
pub(crate) fn load_and_verify(input_dir: &Path, database: &Path, progress: bool) -> Result<()> {
    if !input_dir.is_dir() {
        anyhow::bail!("input directory does not exist: {}", input_dir.display());
    }

    let mut store = Store::open(database)?;
    println!("✓ Connected to database: {}", database.display());

    let stats = store
        .load_dir(input_dir, progress)
        .with_context(|| format!("Import from {} rolled back", input_dir.display()))?;
    print_imports(&stats);

    let summary = store.verify()?;
    print_verification(&summary);
    Ok(())
}

fn print_imports(stats: &ImportStats) {
    println!();
    for import in &stats.tables {
        println!(
            "✓ Imported {} of {} records into '{}'",
            import.rows_inserted, import.rows_read, import.table
        );
    }
    println!("\n✓ {}", stats);
}

fn print_verification(summary: &VerifySummary) {
    println!("\n{}", "=".repeat(60));
    println!("DATA VERIFICATION SUMMARY");
    println!("{}", "=".repeat(60));
    for (table, count) in &summary.table_counts {
        println!("{:<20}: {:>6} records", table, count);
    }

    println!("\n{}", "-".repeat(60));
    println!("Additional Statistics:");
    println!("{}", "-".repeat(60));
    println!("Total Revenue: {}", format_money(summary.total_revenue));
    if let Some(aov) = summary.average_order_value {
        println!("Average Order Value: {}", format_money(aov));
    }
    println!("Total Products Sold: {}", summary.total_products_sold);
    if let Some(rating) = summary.average_rating {
        println!("Average Product Rating: {:.2} stars", rating);
    }

    if !summary.orders_by_status.is_empty() {
        println!("\nOrders by Status:");
        for (status, count) in &summary.orders_by_status {
            println!("  {:<12}: {}", status, count);
        }
    }
    println!("{}", "=".repeat(60));
}
