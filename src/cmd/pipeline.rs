use super::analyze::analyze;
use super::generate::{generate_dataset, write_dataset, GenerationOptions};
use super::load::load_and_verify;
use crate::store::OutputFormat;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  shopdata pipeline
  shopdata pipeline --seed 7 --customers 500 --database shop.duckdb --explain")]
pub struct PipelineArgs {
    /// Directory for the CSV files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// DuckDB database file
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(flatten)]
    pub options: GenerationOptions,

    /// Show import progress
    #[arg(short, long)]
    pub progress: bool,

    /// Print an explanation of the spending query
    #[arg(long)]
    pub explain: bool,
}

pub fn run(args: PipelineArgs) -> Result<()> {
    let mut config = args.options.resolve()?;
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir;
    }
    if args.database.is_some() {
        config.database = args.database;
    }
    let output_dir = config.output_dir();
    let database = config.database();

    println!("[1/3] Generating data");
    let dataset = generate_dataset(config.generator)?;
    write_dataset(&dataset, &output_dir)?;

    println!("\n[2/3] Loading {} into {}", output_dir.display(), database.display());
    load_and_verify(&output_dir, &database, args.progress)?;

    println!("\n[3/3] Analyzing customer spending\n");
    analyze(&database, OutputFormat::Table, args.explain)
}
