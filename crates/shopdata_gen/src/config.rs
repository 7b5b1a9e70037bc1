//! Generation parameters.

use crate::error::GenerateError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;

/// Knobs for a generation pass. Every field has a default, so a partial YAML
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// RNG seed
    pub seed: u64,
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    /// Line items per order, lower bound (inclusive)
    pub min_order_items: usize,
    /// Line items per order, upper bound (inclusive)
    pub max_order_items: usize,
    /// Probability that an order receives order-linked reviews
    pub review_probability: f64,
    /// Number of standalone review draws
    pub standalone_reviews: usize,
    /// Length of the order window, counted back from the reference date
    pub order_window_days: i64,
    /// Maximum gap between an order and its review
    pub review_window_days: i64,
    /// Customers join within this many months before the reference date
    pub join_window_months: u32,
    /// "Today" for all relative dates. `None` means the local date at run time.
    pub reference_date: Option<NaiveDate>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            customers: 100,
            products: 50,
            orders: 200,
            min_order_items: 1,
            max_order_items: 5,
            review_probability: 0.3,
            standalone_reviews: 20,
            order_window_days: 540,
            review_window_days: 30,
            join_window_months: 24,
            reference_date: None,
        }
    }
}

impl GeneratorConfig {
    /// Reject parameter combinations that cannot produce a consistent dataset.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !(0.0..=1.0).contains(&self.review_probability) {
            return Err(GenerateError::InvalidConfig(format!(
                "review_probability must be within [0, 1], got {}",
                self.review_probability
            )));
        }
        if self.min_order_items == 0 {
            return Err(GenerateError::InvalidConfig(
                "min_order_items must be at least 1".to_string(),
            ));
        }
        if self.min_order_items > self.max_order_items {
            return Err(GenerateError::InvalidConfig(format!(
                "min_order_items ({}) exceeds max_order_items ({})",
                self.min_order_items, self.max_order_items
            )));
        }
        if self.orders > 0 && self.customers == 0 {
            return Err(GenerateError::InvalidConfig(
                "orders need at least one customer".to_string(),
            ));
        }
        if self.standalone_reviews > 0 && (self.customers == 0 || self.products == 0) {
            return Err(GenerateError::InvalidConfig(
                "standalone reviews need at least one customer and one product".to_string(),
            ));
        }
        if self.order_window_days < 0 || self.review_window_days < 0 {
            return Err(GenerateError::InvalidConfig(
                "date windows must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// The reference date, falling back to today's local date.
    pub fn resolved_reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
