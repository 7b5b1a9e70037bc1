use crate::analysis::{self, SpendingSummary, QUERY_EXPLANATION};
use crate::config::DEFAULT_DATABASE;
use crate::store::{format_money, OutputFormat, QueryResultFormatter, Store};
use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  shopdata analyze
  shopdata analyze --explain
  shopdata analyze -f json > spending.json")]
pub struct AnalyzeArgs {
    /// DuckDB database file created by `load`
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Output format: table, json, csv
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Print an explanation of the spending query first (to stderr with json or csv)
    #[arg(long)]
    pub explain: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    analyze(&args.database, args.format, args.explain)
}

pub(crate) fn analyze(database: &Path, format: OutputFormat, explain: bool) -> Result<()> {
    if !database.exists() {
        anyhow::bail!(
            "database file '{}' not found; run `shopdata load` first",
            database.display()
        );
    }
    let store = Store::open(database)?;

    // Machine-readable formats keep stdout to the rows
    if format != OutputFormat::Table {
        if explain {
            write_explanation(&mut io::stderr().lock())?;
        }
        let rows = analysis::customer_spending(&store)?;
        let result = analysis::to_query_result(&rows, false);
        let mut stdout = io::stdout().lock();
        QueryResultFormatter::write(&result, format, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    if explain {
        write_explanation(&mut io::stdout().lock())?;
    }

    println!("Executing customer analysis query...");
    let rows = analysis::customer_spending(&store)?;
    let summary = analysis::summarize(&rows);

    println!("\n{}", "=".repeat(80));
    println!("CUSTOMER SPENDING ANALYSIS");
    println!("{}", "=".repeat(80));
    println!("\nTotal customers with orders: {}", summary.customers_with_orders);

    if rows.is_empty() {
        println!("\nNo customers with orders found.");
        return Ok(());
    }

    println!("\nResults (ordered by total amount spent):");
    println!("{}", "-".repeat(80));
    let result = analysis::to_query_result(&rows, true);
    print!("{}", QueryResultFormatter::format(&result, OutputFormat::Table));

    print_summary(&summary);
    Ok(())
}

fn write_explanation<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(out, "{}", rule)?;
    writeln!(out, "SQL QUERY EXPLANATION")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", QUERY_EXPLANATION)?;
    writeln!(out, "{}", rule)?;
    writeln!(out)
}

fn print_summary(summary: &SpendingSummary) {
    println!("\n{}", "-".repeat(80));
    println!("SUMMARY STATISTICS");
    println!("{}", "-".repeat(80));
    println!(
        "Average amount spent per customer: {}",
        format_money(summary.mean_spent)
    );
    println!(
        "Median amount spent per customer: {}",
        format_money(summary.median_spent)
    );
    if let Some((name, spent)) = &summary.top_customer {
        println!("Highest spending customer: {} ({})", name, format_money(*spent));
    }
    println!(
        "Total revenue from all customers: {}",
        format_money(summary.total_revenue)
    );
    println!("Average orders per customer: {:.2}", summary.mean_orders);
    println!("Average items per customer: {:.2}", summary.mean_items);
    println!("{}", "=".repeat(80));
}
