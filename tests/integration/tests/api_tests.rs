//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use board_client::{FeedbackBackend, NewFeedback};
use futures::StreamExt;
use integration_tests::{
    assert_json, assert_status, check_test_env, client_backend, fixtures::*, TestGateway,
    TestServer,
};
use reqwest::StatusCode;
use std::time::Duration;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    for path in ["/health", "/api/v1/health"] {
        let response = server.get(path).await.expect("Request failed");
        assert_status(response, StatusCode::OK).await.unwrap();
    }
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["redis"], "healthy");
}

// ============================================================================
// Submit Tests
// ============================================================================

#[tokio::test]
async fn test_create_feedback() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateFeedback::unique().at(future_time(0));

    let response = server.post("/api/v1/feedback", &request).await.unwrap();
    let created: FeedbackBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.name, request.name);
    assert_eq!(created.comment, request.comment);
    assert_eq!(created.emoji, Some(5));
    assert_eq!(Some(created.created_at), request.created_at);
}

#[tokio::test]
async fn test_create_feedback_without_rating_or_timestamp() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateFeedback::unique().with_emoji(None);
    let before = chrono::Utc::now();

    let response = server.post("/api/v1/feedback", &request).await.unwrap();
    let created: FeedbackBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(created.emoji, None);
    assert!(created.created_at >= before - chrono::Duration::seconds(5));
}

#[tokio::test]
async fn test_create_feedback_short_name() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateFeedback::unique().with_name("A");

    let response = server.post("/api/v1/feedback", &request).await.unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_feedback_rating_out_of_range() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    for emoji in [0, 6] {
        let request = CreateFeedback::unique().with_emoji(Some(emoji));
        let response = server.post("/api/v1/feedback", &request).await.unwrap();
        let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_create_feedback_empty_comment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateFeedback::unique().with_comment("");

    let response = server.post("/api/v1/feedback", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_create_feedback_malformed_body() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post_raw("/api/v1/feedback", r#"{"name": "Ana""#)
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "INVALID_BODY");
}

// ============================================================================
// Recent Feedback Tests
// ============================================================================

#[tokio::test]
async fn test_recent_feedback_newest_first() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let batch = unique_suffix();
    let mut names = Vec::new();
    for offset in [2, 0, 1] {
        let request = CreateFeedback::unique()
            .with_name(format!("order{batch}-{offset}"))
            .at(future_time(offset));
        names.push(request.name.clone());
        let response = server.post("/api/v1/feedback", &request).await.unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get("/api/v1/feedback?limit=50").await.unwrap();
    let recent: Vec<FeedbackBody> = assert_json(response, StatusCode::OK).await.unwrap();

    let ours: Vec<&str> = recent
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| names.iter().any(|n| n == name))
        .collect();
    assert_eq!(
        ours,
        vec![
            format!("order{batch}-2"),
            format!("order{batch}-1"),
            format!("order{batch}-0"),
        ]
    );

    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_recent_feedback_limits() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    for _ in 0..3 {
        let request = CreateFeedback::unique().at(future_time(0));
        server.post("/api/v1/feedback", &request).await.unwrap();
    }

    let response = server.get("/api/v1/feedback?limit=2").await.unwrap();
    let recent: Vec<FeedbackBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(recent.len(), 2);

    // Clamped up to one
    let response = server.get("/api/v1/feedback?limit=0").await.unwrap();
    let recent: Vec<FeedbackBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(recent.len(), 1);

    // Default window
    let response = server.get("/api/v1/feedback").await.unwrap();
    let recent: Vec<FeedbackBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(recent.len() <= 12);
    assert!(recent.len() >= 3);
}

#[tokio::test]
async fn test_recent_feedback_bad_limit() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/feedback?limit=lots").await.unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "INVALID_QUERY_PARAMETER");
}

// ============================================================================
// Options Tests
// ============================================================================

#[tokio::test]
async fn test_feedback_options() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/feedback/options").await.unwrap();
    let options: OptionsBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(options.presets.len(), 5);
    assert_eq!(options.presets[0], "Great experience! Would definitely recommend.");

    let values: Vec<i32> = options.ratings.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![5, 4, 3, 2, 1]);
    assert_eq!(options.ratings[0].label, "Very Good");
    assert_eq!(options.ratings[0].glyph, "😄");
    assert_eq!(options.ratings[0].option_label, "😄 Very Good");
    assert_eq!(options.ratings[2].animation_code, "1f610");
}

// ============================================================================
// Push Tests
// ============================================================================

#[tokio::test]
async fn test_submission_is_pushed_to_boards() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let backend = client_backend(&server, &gateway).unwrap();

    let mut subscription = backend.subscribe().await.unwrap();
    gateway.wait_for_boards(1).await.unwrap();

    let request = CreateFeedback::unique().at(future_time(0));
    let id = backend
        .insert(NewFeedback {
            name: request.name.clone(),
            comment: request.comment.clone(),
            emoji: request.emoji,
            created_at: future_time(0),
        })
        .await
        .unwrap();

    // Other tests publish on the same channel; skip their records
    let pushed = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(record) = subscription.next().await {
            if record.id == id {
                return Some(record);
            }
        }
        None
    })
    .await
    .expect("record was never pushed")
    .expect("subscription ended");

    assert_eq!(pushed.name, request.name);
    assert_eq!(pushed.emoji, Some(5));

    subscription.unsubscribe();
    gateway.wait_for_boards(0).await.unwrap();
}
