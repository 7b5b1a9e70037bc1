//! Data generator that produces the five entity collections.
//!
//! Stages run in dependency order (customers, products, orders and line
//! items, reviews). Each stage returns its rows; later stages only read them.

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::fake::FakeData;
use crate::model::{
    round_cents, Category, Customer, Dataset, LineItem, Order, OrderStatus, Product, Review,
};
use crate::naming;
use chrono::{Days, Months, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const MIN_PRICE: f64 = 9.99;
pub const MAX_PRICE: f64 = 999.99;
pub const MAX_STOCK: i64 = 500;
pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 5;
/// Order-linked reviews per reviewed order, upper bound
pub const MAX_REVIEWS_PER_ORDER: usize = 2;

/// Orders and their line items, generated together
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    pub orders: Vec<Order>,
    pub line_items: Vec<LineItem>,
}

/// Inclusive date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Main data generator
pub struct Generator {
    config: GeneratorConfig,
    today: NaiveDate,
    fake: FakeData<ChaCha8Rng>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        let today = config.resolved_reference_date();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            today,
            fake: FakeData::new(rng),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    /// Window customers join in: the last `join_window_months` months
    pub fn join_window(&self) -> Result<DateWindow, GenerateError> {
        let start = self
            .today
            .checked_sub_months(Months::new(self.config.join_window_months))
            .ok_or_else(|| GenerateError::DateRange("join window start".to_string()))?;
        Ok(DateWindow {
            start,
            end: self.today,
        })
    }

    /// Window orders (and standalone reviews) are placed in
    pub fn order_window(&self) -> Result<DateWindow, GenerateError> {
        let start = self
            .today
            .checked_sub_days(Days::new(self.config.order_window_days as u64))
            .ok_or_else(|| GenerateError::DateRange("order window start".to_string()))?;
        Ok(DateWindow {
            start,
            end: self.today,
        })
    }

    /// Run the whole pipeline
    pub fn generate(&mut self) -> Result<Dataset, GenerateError> {
        let customers = self.generate_customers()?;
        let products = self.generate_products()?;
        let OrderBatch { orders, line_items } = self.generate_orders(&customers, &products)?;
        let reviews = self.generate_reviews(&customers, &products, &orders, &line_items)?;

        Ok(Dataset {
            customers,
            products,
            orders,
            line_items,
            reviews,
        })
    }

    pub fn generate_customers(&mut self) -> Result<Vec<Customer>, GenerateError> {
        let window = self.join_window()?;
        let customers = (1..=self.config.customers as i64)
            .map(|id| {
                let join_date = self.fake.date_between(window.start, window.end)?;
                Ok(Customer {
                    id,
                    name: self.fake.full_name()?,
                    email: self.fake.email()?,
                    location: self.fake.location()?,
                    join_date,
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;

        debug!(count = customers.len(), "generated customers");
        Ok(customers)
    }

    pub fn generate_products(&mut self) -> Result<Vec<Product>, GenerateError> {
        let products = (1..=self.config.products as i64)
            .map(|id| {
                let category = self.fake.pick(&Category::ALL);
                let name = naming::template_for(category)(&mut self.fake)?;
                Ok(Product {
                    id,
                    name,
                    category,
                    price: self.fake.price(MIN_PRICE, MAX_PRICE),
                    stock_quantity: self.fake.int_range(0, MAX_STOCK),
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;

        debug!(count = products.len(), "generated products");
        Ok(products)
    }

    /// Generate orders and their line items.
    ///
    /// Line-item ids run globally across orders. Each order's total is the
    /// rounded sum of its line-item subtotals.
    pub fn generate_orders(
        &mut self,
        customers: &[Customer],
        products: &[Product],
    ) -> Result<OrderBatch, GenerateError> {
        let window = self.order_window()?;
        let prices: HashMap<i64, f64> = products.iter().map(|p| (p.id, p.price)).collect();
        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let customer_ids: Vec<i64> = customers.iter().map(|c| c.id).collect();
        if customer_ids.is_empty() && self.config.orders > 0 {
            return Err(GenerateError::InvalidConfig(
                "orders need at least one customer".to_string(),
            ));
        }

        let mut batch = OrderBatch {
            orders: Vec::with_capacity(self.config.orders),
            line_items: Vec::new(),
        };
        let mut next_item_id = 1;

        for id in 1..=self.config.orders as i64 {
            let customer_id = self.fake.pick(&customer_ids);
            let order_date = self.fake.date_between(window.start, window.end)?;
            let status = self.fake.pick(&OrderStatus::ALL);

            let wanted = self
                .fake
                .count_range(self.config.min_order_items, self.config.max_order_items);
            let selected = self.fake.sample_distinct(&product_ids, wanted);

            let mut total = 0.0;
            for product_id in selected {
                let quantity = self.fake.int_range(MIN_QUANTITY, MAX_QUANTITY);
                let price = prices.get(&product_id).copied().unwrap_or_default();
                let item = LineItem {
                    id: next_item_id,
                    order_id: id,
                    product_id,
                    quantity,
                    price: round_cents(price),
                };
                total += item.subtotal();
                batch.line_items.push(item);
                next_item_id += 1;
            }

            batch.orders.push(Order {
                id,
                customer_id,
                order_date,
                total_amount: round_cents(total),
                status,
            });
        }

        debug!(
            orders = batch.orders.len(),
            line_items = batch.line_items.len(),
            "generated orders"
        );
        Ok(batch)
    }

    /// Generate order-linked reviews, then standalone reviews.
    ///
    /// No two reviews share a (product, customer) pair.
    pub fn generate_reviews(
        &mut self,
        customers: &[Customer],
        products: &[Product],
        orders: &[Order],
        line_items: &[LineItem],
    ) -> Result<Vec<Review>, GenerateError> {
        let mut reviews = Vec::new();
        let mut reviewed: HashSet<(i64, i64)> = HashSet::new();

        // Line items are grouped by order in generation order
        let mut items = line_items.iter().peekable();
        for order in orders {
            let mut order_products = Vec::new();
            while let Some(item) = items.next_if(|item| item.order_id == order.id) {
                order_products.push(item.product_id);
            }

            if !self.fake.bool_with_probability(self.config.review_probability) {
                continue;
            }

            let candidates: Vec<i64> = order_products
                .into_iter()
                .filter(|&product_id| !reviewed.contains(&(product_id, order.customer_id)))
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let count = self
                .fake
                .count_range(1, MAX_REVIEWS_PER_ORDER.min(candidates.len()));
            let review_end = order
                .order_date
                .checked_add_days(Days::new(self.config.review_window_days as u64))
                .ok_or_else(|| GenerateError::DateRange("review window end".to_string()))?;

            for product_id in self.fake.sample_distinct(&candidates, count) {
                let review_date = self.fake.date_between(order.order_date, review_end)?;
                let review = self.review(
                    reviews.len() as i64 + 1,
                    product_id,
                    order.customer_id,
                    review_date,
                )?;
                reviewed.insert((product_id, order.customer_id));
                reviews.push(review);
            }
        }
        let linked = reviews.len();

        let window = self.order_window()?;
        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let customer_ids: Vec<i64> = customers.iter().map(|c| c.id).collect();
        let standalone = if product_ids.is_empty() || customer_ids.is_empty() {
            0
        } else {
            self.config.standalone_reviews
        };
        let mut skipped = 0;
        for _ in 0..standalone {
            let product_id = self.fake.pick(&product_ids);
            let customer_id = self.fake.pick(&customer_ids);
            if !reviewed.insert((product_id, customer_id)) {
                skipped += 1;
                continue;
            }
            let review_date = self.fake.date_between(window.start, window.end)?;
            let review =
                self.review(reviews.len() as i64 + 1, product_id, customer_id, review_date)?;
            reviews.push(review);
        }

        debug!(
            linked,
            standalone = reviews.len() - linked,
            skipped,
            "generated reviews"
        );
        Ok(reviews)
    }

    fn review(
        &mut self,
        id: i64,
        product_id: i64,
        customer_id: i64,
        review_date: NaiveDate,
    ) -> Result<Review, GenerateError> {
        let rating = self.fake.rating()?;
        let (min_words, max_words) = comment_length(rating);
        let words = self.fake.count_range(min_words, max_words);
        Ok(Review {
            id,
            product_id,
            customer_id,
            rating,
            comment: self.fake.sentence(words)?,
            review_date,
        })
    }
}

/// Comment word-count range for a rating
pub fn comment_length(rating: u8) -> (usize, usize) {
    match rating {
        4.. => (5, 15),
        3 => (3, 10),
        _ => (5, 12),
    }
}
