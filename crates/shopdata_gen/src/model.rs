//! Entity records produced by the generator.
//!
//! Field renames match the CSV column contract, so serializing a record with
//! the `csv` crate yields the expected header row.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Electronics,
    Clothing,
    #[serde(rename = "Home & Kitchen")]
    HomeAndKitchen,
    Books,
    #[serde(rename = "Sports & Outdoors")]
    SportsAndOutdoors,
    #[serde(rename = "Beauty & Personal Care")]
    BeautyAndPersonalCare,
    #[serde(rename = "Toys & Games")]
    ToysAndGames,
    Automotive,
    #[serde(rename = "Health & Wellness")]
    HealthAndWellness,
    #[serde(rename = "Food & Beverages")]
    FoodAndBeverages,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Electronics,
        Category::Clothing,
        Category::HomeAndKitchen,
        Category::Books,
        Category::SportsAndOutdoors,
        Category::BeautyAndPersonalCare,
        Category::ToysAndGames,
        Category::Automotive,
        Category::HealthAndWellness,
        Category::FoodAndBeverages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Books => "Books",
            Category::SportsAndOutdoors => "Sports & Outdoors",
            Category::BeautyAndPersonalCare => "Beauty & Personal Care",
            Category::ToysAndGames => "Toys & Games",
            Category::Automotive => "Automotive",
            Category::HealthAndWellness => "Health & Wellness",
            Category::FoodAndBeverages => "Food & Beverages",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    #[serde(rename = "customer_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub location: String,
    pub join_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: i64,
    #[serde(rename = "product_name")]
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    #[serde(rename = "order_id")]
    pub id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub total_amount: f64,
    pub status: OrderStatus,
}

/// One product-and-quantity entry within an order.
///
/// `price` is the product's price at generation time, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    #[serde(rename = "order_item_id")]
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    #[serde(rename = "review_id")]
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: u8,
    pub comment: String,
    pub review_date: NaiveDate,
}

/// The complete generated dataset, one collection per entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub line_items: Vec<LineItem>,
    pub reviews: Vec<Review>,
}

impl Dataset {
    /// Row counts per table, in dependency order
    pub fn row_counts(&self) -> [(&'static str, usize); 5] {
        [
            ("customers", self.customers.len()),
            ("products", self.products.len()),
            ("orders", self.orders.len()),
            ("order_items", self.line_items.len()),
            ("reviews", self.reviews.len()),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.row_counts().iter().map(|(_, n)| n).sum()
    }
}

/// Round to 2 decimal places (cents)
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
