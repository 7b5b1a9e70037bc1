use crate::config::ProjectConfig;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use shopdata_gen::{CsvRenderer, Dataset, Generator, GeneratorConfig, RenderStats};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Options shared by `generate` and `pipeline`
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationOptions {
    /// YAML config file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of customers
    #[arg(long)]
    pub customers: Option<usize>,

    /// Number of products
    #[arg(long)]
    pub products: Option<usize>,

    /// Number of orders
    #[arg(long)]
    pub orders: Option<usize>,

    /// Probability (0-1) that an order gets reviews
    #[arg(long, value_name = "P")]
    pub review_probability: Option<f64>,

    /// Number of standalone review draws
    #[arg(long, value_name = "N")]
    pub standalone_reviews: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Date treated as "today" (YYYY-MM-DD, defaults to the local date)
    #[arg(long, value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,
}

impl GenerationOptions {
    /// Load the config file (if any) and apply flag overrides
    pub fn resolve(&self) -> Result<ProjectConfig> {
        let mut config = ProjectConfig::load_or_default(self.config.as_deref())
            .with_context(|| match &self.config {
                Some(path) => format!("Failed to load config file: {}", path.display()),
                None => "Failed to build default config".to_string(),
            })?;
        self.apply(&mut config.generator);
        Ok(config)
    }

    fn apply(&self, generator: &mut GeneratorConfig) {
        if let Some(n) = self.customers {
            generator.customers = n;
        }
        if let Some(n) = self.products {
            generator.products = n;
        }
        if let Some(n) = self.orders {
            generator.orders = n;
        }
        if let Some(p) = self.review_probability {
            generator.review_probability = p;
        }
        if let Some(n) = self.standalone_reviews {
            generator.standalone_reviews = n;
        }
        if let Some(seed) = self.seed {
            generator.seed = seed;
        }
        if self.reference_date.is_some() {
            generator.reference_date = self.reference_date;
        }
    }
}

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  shopdata generate
  shopdata generate --customers 1000 --orders 5000 -o data
  shopdata generate --seed 7 --reference-date 2025-01-31
  shopdata generate --config shopdata.yaml --dry-run")]
pub struct GenerateArgs {
    /// Directory for the CSV files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub options: GenerationOptions,

    /// Generate and report counts without writing files
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let mut config = args.options.resolve()?;
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir;
    }
    let output_dir = config.output_dir();

    let dataset = generate_dataset(config.generator)?;

    if args.dry_run {
        println!("Dry run: no files written");
        print_summary(&dataset);
        return Ok(());
    }

    write_dataset(&dataset, &output_dir)?;
    print_summary(&dataset);
    println!("\nAll CSV files have been generated successfully!");
    Ok(())
}

/// Build the dataset, reporting the seed and reference date in use
pub(crate) fn generate_dataset(config: GeneratorConfig) -> Result<Dataset> {
    let mut generator = Generator::new(config).context("Invalid generator configuration")?;
    println!(
        "Generating dataset [seed: {}, reference date: {}]...",
        generator.config().seed,
        generator.reference_date()
    );

    let start = Instant::now();
    let dataset = generator.generate().context("Data generation failed")?;
    debug!(
        rows = dataset.total_rows(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "generated dataset"
    );
    Ok(dataset)
}

/// Write all five CSV files and report each one
pub(crate) fn write_dataset(dataset: &Dataset, dir: &Path) -> Result<RenderStats> {
    let stats = CsvRenderer::new()
        .write_all(dataset, dir)
        .with_context(|| format!("Failed to write CSV files to {}", dir.display()))?;

    for file in &stats.files {
        println!(
            "✓ Generated {} {} -> {}",
            file.rows,
            file.table.replace('_', " "),
            file.path.display()
        );
    }
    debug!(bytes = stats.total_bytes(), "csv files written");
    Ok(stats)
}

fn print_summary(dataset: &Dataset) {
    println!("\n{}", "=".repeat(50));
    println!("DATA GENERATION SUMMARY");
    println!("{}", "=".repeat(50));
    for (table, count) in dataset.row_counts() {
        println!("{:<12} {:>8}", format!("{}:", title(table)), count);
    }
    println!("{}", "=".repeat(50));
}

/// `order_items` -> `Order Items`
fn title(table: &str) -> String {
    table
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let options = GenerationOptions {
            customers: Some(5),
            seed: Some(9),
            review_probability: Some(1.0),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.generator.customers, 5);
        assert_eq!(config.generator.seed, 9);
        assert_eq!(config.generator.review_probability, 1.0);
        assert_eq!(config.generator.products, 50);
    }

    #[test]
    fn test_title() {
        assert_eq!(title("order_items"), "Order Items");
        assert_eq!(title("customers"), "Customers");
    }
}
