//! Synthetic e-commerce dataset generator.
//!
//! Generates deterministic, FK-consistent customers, products, orders,
//! order items and reviews, and renders them as CSV files.
//!
//! # Example
//!
//! ```rust,no_run
//! use shopdata_gen::{CsvRenderer, Generator, GeneratorConfig};
//! use std::path::Path;
//!
//! let mut gen = Generator::new(GeneratorConfig::default()).unwrap();
//! let data = gen.generate().unwrap();
//!
//! CsvRenderer::new().write_all(&data, Path::new("data")).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod fake;
pub mod generator;
pub mod model;
pub mod naming;
pub mod renderer;
pub mod schema;

pub use config::GeneratorConfig;
pub use error::{GenerateError, RenderError};
pub use generator::{DateWindow, Generator, OrderBatch};
pub use model::{
    round_cents, Category, Customer, Dataset, LineItem, Order, OrderStatus, Product, Review,
};
pub use renderer::{CsvRenderer, FileStats, RenderStats};
pub use schema::{Column, Schema, SqlType, Table};
