//! Property tests for a full generation pass.

use chrono::{Days, NaiveDate};
use shopdata_gen::{round_cents, Dataset, Generator, GeneratorConfig, Order};
use std::collections::{HashMap, HashSet};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn generate(config: GeneratorConfig) -> Dataset {
    Generator::new(config).unwrap().generate().unwrap()
}

fn default_dataset() -> Dataset {
    generate(GeneratorConfig {
        reference_date: Some(reference_date()),
        ..Default::default()
    })
}

#[test]
fn test_default_counts() {
    let data = default_dataset();

    assert_eq!(data.customers.len(), 100);
    assert_eq!(data.products.len(), 50);
    assert_eq!(data.orders.len(), 200);
    assert!((200..=1000).contains(&data.line_items.len()));
    assert!(data.reviews.len() <= 200 * 2 + 20);
}

#[test]
fn test_order_totals_match_line_items() {
    let data = default_dataset();

    let mut sums: HashMap<i64, f64> = HashMap::new();
    for item in &data.line_items {
        *sums.entry(item.order_id).or_default() += item.subtotal();
    }
    for order in &data.orders {
        let expected = round_cents(sums.get(&order.id).copied().unwrap_or(0.0));
        assert!(
            (order.total_amount - expected).abs() < 0.01,
            "order {} total {} != {}",
            order.id,
            order.total_amount,
            expected
        );
    }
}

#[test]
fn test_referential_integrity() {
    let data = default_dataset();

    let customer_ids: HashSet<i64> = data.customers.iter().map(|c| c.id).collect();
    let product_ids: HashSet<i64> = data.products.iter().map(|p| p.id).collect();
    let order_ids: HashSet<i64> = data.orders.iter().map(|o| o.id).collect();

    for order in &data.orders {
        assert!(customer_ids.contains(&order.customer_id));
    }
    for item in &data.line_items {
        assert!(order_ids.contains(&item.order_id));
        assert!(product_ids.contains(&item.product_id));
        assert!((1..=5).contains(&item.quantity));
    }
    for review in &data.reviews {
        assert!(customer_ids.contains(&review.customer_id));
        assert!(product_ids.contains(&review.product_id));
    }
}

#[test]
fn test_reviews_unique_and_rated() {
    let data = default_dataset();

    let mut pairs = HashSet::new();
    for review in &data.reviews {
        assert!((1..=5).contains(&review.rating));
        assert!(
            pairs.insert((review.product_id, review.customer_id)),
            "duplicate review for product {} by customer {}",
            review.product_id,
            review.customer_id
        );
        assert!(review.comment.ends_with('.'));
    }
}

#[test]
fn test_prices_and_stock_in_range() {
    let data = default_dataset();

    for product in &data.products {
        assert!((9.99..=999.99).contains(&product.price));
        assert!((0..=500).contains(&product.stock_quantity));
    }
    for customer in &data.customers {
        assert!(customer.join_date <= reference_date());
        assert!(customer.email.contains('@'));
    }
}

#[test]
fn test_same_inputs_same_dataset() {
    assert_eq!(default_dataset(), default_dataset());
}

#[test]
fn test_different_seed_changes_dataset() {
    let other = generate(GeneratorConfig {
        seed: 43,
        reference_date: Some(reference_date()),
        ..Default::default()
    });
    assert_ne!(default_dataset(), other);
}

#[test]
fn test_empty_dataset() {
    let data = generate(GeneratorConfig {
        customers: 0,
        products: 0,
        orders: 0,
        standalone_reviews: 0,
        reference_date: Some(reference_date()),
        ..Default::default()
    });
    assert_eq!(data.total_rows(), 0);
}

#[test]
fn test_order_linked_review_dates_follow_order() {
    // Without standalone reviews every review belongs to an order
    let data = generate(GeneratorConfig {
        standalone_reviews: 0,
        reference_date: Some(reference_date()),
        ..Default::default()
    });
    assert!(!data.reviews.is_empty());

    let mut purchases: HashMap<(i64, i64), Vec<NaiveDate>> = HashMap::new();
    let orders_by_id: HashMap<i64, &Order> =
        data.orders.iter().map(|o| (o.id, o)).collect();
    for item in &data.line_items {
        let order = orders_by_id[&item.order_id];
        purchases
            .entry((item.product_id, order.customer_id))
            .or_default()
            .push(order.order_date);
    }

    for review in &data.reviews {
        let dates = &purchases[&(review.product_id, review.customer_id)];
        assert!(
            dates
                .iter()
                .any(|&d| review.review_date >= d && review.review_date <= d + Days::new(30)),
            "review {} dated {} is not within 30 days of a matching order",
            review.id,
            review.review_date
        );
    }
}

#[test]
fn test_standalone_review_dates_in_order_window() {
    let data = generate(GeneratorConfig {
        review_probability: 0.0,
        standalone_reviews: 100,
        reference_date: Some(reference_date()),
        ..Default::default()
    });
    assert!(!data.reviews.is_empty());

    let window_start = reference_date() - Days::new(540);
    for review in &data.reviews {
        assert!(
            review.review_date >= window_start && review.review_date <= reference_date(),
            "review {} dated {}",
            review.id,
            review.review_date
        );
    }
}

#[test]
fn test_join_dates_within_two_years() {
    let data = default_dataset();

    let earliest = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
    for customer in &data.customers {
        assert!(
            customer.join_date >= earliest && customer.join_date <= reference_date(),
            "customer {} joined {}",
            customer.id,
            customer.join_date
        );
    }
}
