//! YAML configuration file.
//!
//! ```yaml
//! output_dir: data
//! database: ecommerce.duckdb
//! generator:
//!   seed: 7
//!   customers: 500
//!   reference_date: 2025-01-31
//! ```
//!
//! Command-line flags override values from the file.

use serde::{Deserialize, Serialize};
use shopdata_gen::GeneratorConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_DATABASE: &str = "ecommerce.duckdb";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory the CSV files are written to and loaded from
    pub output_dir: Option<PathBuf>,
    /// DuckDB database file
    pub database: Option<PathBuf>,
    pub generator: GeneratorConfig,
}

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ProjectConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn database(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }
}
