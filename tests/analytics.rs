mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use common::test_app;

#[tokio::test]
async fn dashboard_with_no_entities_is_all_zeros() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;

    let (status, body) = app.get("/api/analytics/dashboard", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalEntities"], json!(0));
    assert_eq!(data["activeEntities"], json!(0));
    assert_eq!(data["totalViews"], json!(0));
    // Exactly 0, not NaN or null
    assert_eq!(data["avgEngagement"], json!(0.0));
    assert_eq!(data["trend"], json!(0));
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_active_and_total_separately() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;
    app.create_entity(&token, "a", "general").await?;
    app.create_entity(&token, "b", "general").await?;
    let parked = app.create_entity(&token, "c", "general").await?;
    let id = parked["id"].as_str().unwrap();
    app.put(&format!("/api/entities/{id}"), Some(&token), json!({ "status": "inactive" }))
        .await?;

    let (_, body) = app.get("/api/analytics/dashboard", Some(&token)).await?;
    assert_eq!(body["data"]["totalEntities"], json!(3));
    assert_eq!(body["data"]["activeEntities"], json!(2));
    // All created this month with an empty prior month: the documented
    // zero-division convention makes this 0, not infinity
    assert_eq!(body["data"]["trend"], json!(0));
    Ok(())
}

#[tokio::test]
async fn dashboard_is_owner_scoped() -> Result<()> {
    let app = test_app();
    let owner = app.signup("owner@example.com", "password123", "Owner").await?;
    let other = app.signup("other@example.com", "password123", "Other").await?;
    app.create_entity(&owner, "mine", "general").await?;

    let (_, body) = app.get("/api/analytics/dashboard", Some(&other)).await?;
    assert_eq!(body["data"]["totalEntities"], json!(0));
    Ok(())
}

#[tokio::test]
async fn performance_groups_same_day_entities_into_one_bucket() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;
    app.create_entity(&token, "a", "general").await?;
    app.create_entity(&token, "b", "general").await?;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let uri = format!("/api/analytics/performance?startDate={today}&endDate={today}");
    let (status, body) = app.get(&uri, Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);

    let buckets = body["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["date"], json!(today));
    assert_eq!(buckets[0]["entities"], json!(2));
    assert_eq!(buckets[0]["views"], json!(0));
    Ok(())
}

#[tokio::test]
async fn performance_outside_the_range_is_an_empty_array() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;
    app.create_entity(&token, "a", "general").await?;

    let uri = "/api/analytics/performance?startDate=2000-01-01&endDate=2000-01-31";
    let (status, body) = app.get(uri, Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn performance_validates_dates_and_period() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;

    let (status, body) = app
        .get("/api/analytics/performance?startDate=whenever&endDate=2025-01-31", Some(&token))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fieldErrors"]["startDate"].is_string());

    // Missing dates fail the same way
    let (status, _) = app.get("/api/analytics/performance", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(
            "/api/analytics/performance?startDate=2025-01-01&endDate=2025-01-31&period=hourly",
            Some(&token),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn performance_accepts_weekly_and_monthly_periods() -> Result<()> {
    let app = test_app();
    let token = app.signup("owner@example.com", "password123", "Owner").await?;
    app.create_entity(&token, "a", "general").await?;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    for period in ["weekly", "monthly"] {
        let uri = format!(
            "/api/analytics/performance?startDate={today}&endDate={today}&period={period}"
        );
        let (status, body) = app.get(&uri, Some(&token)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["entities"], json!(1));
    }
    Ok(())
}

#[tokio::test]
async fn analytics_requires_a_credential() -> Result<()> {
    let app = test_app();
    let (status, _) = app.get("/api/analytics/dashboard", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
