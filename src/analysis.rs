//! Customer spending analysis.

use crate::store::{format_money, QueryResult, Store};
use anyhow::{Context, Result};
use serde::Serialize;

/// Per-customer spend across orders, items and products
pub const CUSTOMER_SPENDING_SQL: &str = "
SELECT
    c.name AS customer_name,
    COUNT(DISTINCT o.order_id) AS total_orders,
    CAST(SUM(oi.quantity) AS BIGINT) AS total_items_purchased,
    ROUND(SUM(oi.quantity * oi.price), 2) AS total_amount_spent
FROM
    customers c
INNER JOIN
    orders o ON c.customer_id = o.customer_id
INNER JOIN
    order_items oi ON o.order_id = oi.order_id
INNER JOIN
    products p ON oi.product_id = p.product_id
GROUP BY
    c.customer_id, c.name
HAVING
    COUNT(DISTINCT o.order_id) >= 1
ORDER BY
    total_amount_spent DESC, c.customer_id
";

pub const QUERY_EXPLANATION: &str = "\
The query performs the following operations:

1. JOINS:
   - customers -> orders (via customer_id)
   - orders -> order_items (via order_id)
   - order_items -> products (via product_id)

2. AGGREGATIONS:
   - COUNT(DISTINCT o.order_id): unique orders per customer
   - SUM(oi.quantity): items purchased across all orders
   - SUM(oi.quantity * oi.price): amount spent (revenue per customer)

3. FILTERING:
   - INNER JOIN keeps only customers with orders
   - HAVING keeps customers with at least 1 order

4. ORDERING:
   - Sorted by total amount spent, highest first
";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub customer_name: String,
    pub total_orders: i64,
    pub total_items_purchased: i64,
    pub total_amount_spent: f64,
}

/// Aggregates over the spending rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub customers_with_orders: usize,
    pub mean_spent: f64,
    pub median_spent: f64,
    pub top_customer: Option<(String, f64)>,
    pub total_revenue: f64,
    pub mean_orders: f64,
    pub mean_items: f64,
}

/// Run the spending query, highest spender first
pub fn customer_spending(store: &Store) -> Result<Vec<CustomerSpend>> {
    let mut stmt = store
        .connection()
        .prepare(CUSTOMER_SPENDING_SQL)
        .context("Failed to prepare customer spending query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CustomerSpend {
                customer_name: row.get(0)?,
                total_orders: row.get(1)?,
                total_items_purchased: row.get(2)?,
                total_amount_spent: row.get(3)?,
            })
        })?
        .collect::<duckdb::Result<Vec<_>>>()
        .context("Failed to execute customer spending query")?;
    Ok(rows)
}

pub fn summarize(rows: &[CustomerSpend]) -> SpendingSummary {
    let n = rows.len();

    let mut spent: Vec<f64> = rows.iter().map(|r| r.total_amount_spent).collect();
    spent.sort_by(|a, b| a.total_cmp(b));
    let median_spent = match n {
        0 => 0.0,
        _ if n % 2 == 1 => spent[n / 2],
        _ => (spent[n / 2 - 1] + spent[n / 2]) / 2.0,
    };

    SpendingSummary {
        customers_with_orders: n,
        mean_spent: mean(rows.iter().map(|r| r.total_amount_spent), n),
        median_spent,
        top_customer: rows
            .first()
            .map(|r| (r.customer_name.clone(), r.total_amount_spent)),
        total_revenue: spent.iter().sum(),
        mean_orders: mean(rows.iter().map(|r| r.total_orders as f64), n),
        mean_items: mean(rows.iter().map(|r| r.total_items_purchased as f64), n),
    }
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        values.sum::<f64>() / n as f64
    }
}

/// Tabular view of the spending rows. Money is formatted for display only
/// when `pretty` is set; JSON and CSV output keep plain numbers.
pub fn to_query_result(rows: &[CustomerSpend], pretty: bool) -> QueryResult {
    let columns = if pretty {
        vec![
            "Customer Name".to_string(),
            "Total Orders".to_string(),
            "Total Items".to_string(),
            "Total Amount Spent".to_string(),
        ]
    } else {
        vec![
            "customer_name".to_string(),
            "total_orders".to_string(),
            "total_items_purchased".to_string(),
            "total_amount_spent".to_string(),
        ]
    };

    let rows = rows
        .iter()
        .map(|r| {
            vec![
                r.customer_name.clone(),
                r.total_orders.to_string(),
                r.total_items_purchased.to_string(),
                if pretty {
                    format_money(r.total_amount_spent)
                } else {
                    format!("{:.2}", r.total_amount_spent)
                },
            ]
        })
        .collect();

    QueryResult { columns, rows }
}
