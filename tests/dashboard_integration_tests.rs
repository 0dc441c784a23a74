mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::TestHarness;
use payments_dashboard::database::entities::{PaymentStatus, ServiceType};
use payments_dashboard::test_utils::Fixture;

#[tokio::test]
async fn test_empty_store_returns_empty_result_sets() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.get_json("/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["recent_payments"].as_array().unwrap().is_empty());
    assert!(body["service_stats"].as_array().unwrap().is_empty());
    assert!(body["top_customers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mixed_status_service_statistics() {
    let harness = TestHarness::new().await;
    let fixture = Fixture::new(harness.server.database.as_ref());

    let mobile = fixture.service("Mobile Plan 20GB", ServiceType::Mobile, 100.0).await;
    let payments = [
        ("A", 100.0, PaymentStatus::Completed),
        ("B", 50.0, PaymentStatus::Failed),
        ("C", 100.0, PaymentStatus::Completed),
    ];
    for (day, (name, amount, status)) in payments.into_iter().enumerate() {
        let customer = fixture.customer(name).await;
        let purchase = fixture.purchase(customer, mobile).await;
        let at = Utc.with_ymd_and_hms(2025, 2, 1 + day as u32, 9, 30, 0).unwrap();
        fixture.payment(customer, purchase, amount, status, at).await;
    }

    let (status, body) = harness.get_json("/api/dashboard/service-stats").await;
    assert_eq!(status, StatusCode::OK);

    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    let mobile_stats = &groups[0];
    assert_eq!(mobile_stats["service_type"], "mobile");
    assert_eq!(mobile_stats["total_payments"], 3);
    assert_eq!(mobile_stats["total_amount"], 250.0);
    assert_eq!(mobile_stats["successful_payments"], 2);

    let avg = mobile_stats["avg_amount"].as_f64().unwrap();
    assert!((avg - 83.33).abs() < 0.01);
    let rate = mobile_stats["success_rate"].as_f64().unwrap();
    assert!((rate - 0.667).abs() < 0.001);
}

#[tokio::test]
async fn test_recent_payments_and_top_customers_ordering() {
    let harness = TestHarness::new().await;
    let fixture = Fixture::new(harness.server.database.as_ref());
    let tv = fixture.service("Sports TV Package", ServiceType::Tv, 20.0).await;
    let same_time = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

    let mut payment_ids = Vec::new();
    for (name, amount) in [("x", 40.0), ("y", 40.0), ("z", 10.0)] {
        let customer = fixture.customer(name).await;
        let purchase = fixture.purchase(customer, tv).await;
        payment_ids.push(
            fixture
                .payment(customer, purchase, amount, PaymentStatus::Completed, same_time)
                .await,
        );
    }

    let (_, recent) = harness.get_json("/api/dashboard/recent-payments").await;
    let ids: Vec<i64> = recent
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["payment_id"].as_i64().unwrap())
        .collect();
    let expected: Vec<i64> = payment_ids.iter().rev().map(|id| *id as i64).collect();
    assert_eq!(ids, expected);

    let (_, top) = harness.get_json("/api/dashboard/top-customers?limit=2").await;
    let names: Vec<_> = top
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["customer_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(top[0]["avg_payment"], 40.0);
}

#[tokio::test]
async fn test_limits_are_clamped() {
    let harness = TestHarness::new().await;
    let fixture = Fixture::new(harness.server.database.as_ref());
    let service = fixture.service("DSL Internet 25Mbps", ServiceType::Internet, 18.0).await;
    let customer = fixture.customer("bulk").await;
    let purchase = fixture.purchase(customer, service).await;
    for hour in 0..12 {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0).unwrap();
        fixture
            .payment(customer, purchase, 18.0, PaymentStatus::Pending, at)
            .await;
    }

    let max_limit = harness.server.config.dashboard.max_limit;
    let (status, body) = harness
        .get_json(&format!("/api/dashboard?recent_limit={}", max_limit + 50))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recent_payments"].as_array().unwrap().len(), 12);
    assert_eq!(body["service_stats"][0]["success_rate"], 0.0);

    let (_, body) = harness.get_json("/api/dashboard").await;
    assert_eq!(body["recent_payments"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_customer_lookup_and_errors() {
    let harness = TestHarness::new().await;
    let customer = Fixture::new(harness.server.database.as_ref())
        .customer("Lookup")
        .await;

    let (status, body) = harness.get_json(&format!("/api/customers/{customer}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "lookup@example.com");

    let (status, body) = harness.get_json("/api/customers/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["message"], "Not found: Customer 9999 not found");
}

#[tokio::test]
async fn test_health_and_openapi_are_served() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.get_json("/health?check=database").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "healthy");

    let (status, body) = harness.get_json("/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/dashboard"].is_object());
}
