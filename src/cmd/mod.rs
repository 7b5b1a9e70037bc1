mod analyze;
mod generate;
mod load;
mod pipeline;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

pub use analyze::AnalyzeArgs;
pub use generate::GenerateArgs;
pub use load::LoadArgs;
pub use pipeline::PipelineArgs;

#[derive(Parser)]
#[command(name = "shopdata")]
#[command(version)]
#[command(
    about = "Generate synthetic e-commerce data, load it into DuckDB and analyze customer spending",
    long_about = None
)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate customers, products, orders and reviews as CSV files
    Generate(GenerateArgs),

    /// Load generated CSV files into a DuckDB database
    Load(LoadArgs),

    /// Report per-customer spending from a loaded database
    Analyze(AnalyzeArgs),

    /// Generate, load and analyze in one run
    Pipeline(PipelineArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Load(args) => load::run(args),
        Commands::Analyze(args) => analyze::run(args),
        Commands::Pipeline(args) => pipeline::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "shopdata", &mut io::stdout());
            Ok(())
        }
    }
}
