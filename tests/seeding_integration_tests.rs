mod common;

use chrono::{TimeZone, Utc};
use common::TestHarness;
use payments_dashboard::seeding::{DataGenerator, SeedOptions};
use std::collections::HashMap;

fn options() -> SeedOptions {
    SeedOptions {
        customers: 25,
        purchases: 80,
        payments: 400,
        seed: 2024,
        clear_first: true,
        now: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_seeded_totals_match_top_customers() {
    let harness = TestHarness::new().await;
    let database = harness.server.database.clone();

    let report = DataGenerator::run(database.clone(), &options()).await.unwrap();
    assert_eq!(report.payments, 400);

    let mut expected: HashMap<i32, (f64, i64)> = HashMap::new();
    for customer_id in database.customers().all_ids().await.unwrap() {
        for payment in database.payments().find_by_customer(customer_id).await.unwrap() {
            let entry = expected.entry(customer_id).or_default();
            entry.0 += payment.amount;
            entry.1 += 1;
        }
    }

    let top = harness.server.dashboard.top_customers(Some(100)).await.unwrap();
    assert_eq!(top.len(), expected.len());
    for customer in &top {
        let (total, count) = expected[&customer.customer_id];
        assert!((customer.total_spent - total).abs() < 1e-6);
        assert_eq!(customer.payment_count, count);
    }
    assert!(top.windows(2).all(|w| w[0].total_spent >= w[1].total_spent));
}

#[tokio::test]
async fn test_seeded_service_stats_cover_all_payments() {
    let harness = TestHarness::new().await;
    DataGenerator::run(harness.server.database.clone(), &options())
        .await
        .unwrap();

    let (_, body) = harness.get_json("/api/dashboard/service-stats").await;
    let groups = body.as_array().unwrap();
    let total: i64 = groups
        .iter()
        .map(|g| g["total_payments"].as_i64().unwrap())
        .sum();
    assert_eq!(total, 400);

    for group in groups {
        let service_type = group["service_type"].as_str().unwrap();
        assert!(["internet", "mobile", "tv"].contains(&service_type));
        let rate = group["success_rate"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&rate));
    }
}

#[tokio::test]
async fn test_reseeding_replaces_previous_data() {
    let harness = TestHarness::new().await;
    let database = harness.server.database.clone();

    DataGenerator::run(database.clone(), &options()).await.unwrap();
    let second = SeedOptions {
        customers: 5,
        purchases: 5,
        payments: 10,
        ..options()
    };
    DataGenerator::run(database.clone(), &second).await.unwrap();

    assert_eq!(database.customers().count().await.unwrap(), 5);
    assert_eq!(database.services().count().await.unwrap(), 20);
    assert_eq!(database.payments().count().await.unwrap(), 10);
}
