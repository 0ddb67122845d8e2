//! End-to-end orchestration scenarios against in-memory collaborators

mod common;

use common::{
    dashboard_body, feedback, orchestrator, two_item_body, wait_until, FakeDashboard,
    FakeSentiment,
};
use feedbackhub_core::{
    AnalysisOutcome, AnalysisResult, AnalysisState, Category, CategoryFilter, FeedbackError,
    FeedbackId, PageId, Polarity, ServiceError,
};
use serde_json::json;
use std::sync::Arc;

fn ids(items: &[feedbackhub_core::FeedbackItem]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}

#[tokio::test]
async fn test_load_and_filter_by_category() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new());
    let orchestrator = orchestrator(&dashboard, &sentiment);

    let operator = orchestrator.initialize().await.unwrap();
    assert_eq!(operator.name, "Ada");
    assert_eq!(operator.extra.get("email"), Some(&json!("ops@example.com")));

    orchestrator.change_filter(CategoryFilter::Only(Category::from("bug")));
    assert_eq!(ids(&orchestrator.filtered_view()), vec!["1"]);

    let categories: Vec<String> = orchestrator
        .categories()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(categories, vec!["bug", "feature"]);

    orchestrator.change_filter(CategoryFilter::All);
    assert_eq!(ids(&orchestrator.filtered_view()), vec!["1", "2"]);
}

#[tokio::test]
async fn test_analysis_stores_positive_result() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    let outcome = orchestrator.analyze_item(&id, "great job").await.unwrap();
    assert_eq!(outcome, AnalysisOutcome::Completed(AnalysisResult::new(0.8)));

    match orchestrator.result_for(&id) {
        AnalysisState::Present(result) => {
            assert_eq!(result.score, 0.8);
            assert_eq!(result.polarity(), Polarity::Positive);
        }
        other => panic!("Expected Present, got {:?}", other),
    }
    assert_eq!(orchestrator.result_for(&FeedbackId::from("2")), AnalysisState::Absent);
}

#[tokio::test]
async fn test_delete_removes_item_and_analysis() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    orchestrator.analyze_item(&id, "great job").await.unwrap();

    let removed = orchestrator.delete_item(&PageId::from("p1")).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(dashboard.deleted(), vec![PageId::from("p1")]);
    assert_eq!(ids(&orchestrator.canonical()), vec!["2"]);
    assert_eq!(ids(&orchestrator.filtered_view()), vec!["2"]);
    assert_eq!(orchestrator.result_for(&id), AnalysisState::Absent);

    let categories: Vec<String> = orchestrator
        .categories()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(categories, vec!["feature"]);
}

#[tokio::test]
async fn test_delete_unknown_page_succeeds_as_noop() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new());
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let removed = orchestrator.delete_item(&PageId::from("p9")).await.unwrap();
    assert_eq!(removed, 0);
    assert_eq!(orchestrator.canonical().len(), 2);
}

#[tokio::test]
async fn test_delete_failure_leaves_state_unchanged() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();
    orchestrator
        .analyze_item(&FeedbackId::from("1"), "great job")
        .await
        .unwrap();

    dashboard.fail_deletes_with(Some(ServiceError::Status {
        status: 500,
        message: "boom".to_string(),
    }));
    match orchestrator.delete_item(&PageId::from("p1")).await {
        Err(FeedbackError::DeletionFailed { page_id, reason }) => {
            assert_eq!(page_id, PageId::from("p1"));
            assert!(reason.contains("boom"));
        }
        other => panic!("Expected DeletionFailed, got {:?}", other),
    }
    assert_eq!(orchestrator.canonical().len(), 2);
    assert!(orchestrator
        .result_for(&FeedbackId::from("1"))
        .result()
        .is_some());

    // Manual retry after the backend recovers
    dashboard.fail_deletes_with(None);
    assert_eq!(orchestrator.delete_item(&PageId::from("p1")).await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_trigger_sends_one_request() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8).gate("great job"));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    let first = orchestrator.spawn_analysis(id.clone(), "great job".to_string());
    wait_until(|| orchestrator.result_for(&id).is_pending()).await;

    let second = orchestrator.analyze_item(&id, "great job").await.unwrap();
    assert_eq!(second, AnalysisOutcome::Suppressed);

    sentiment.release("great job");
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, AnalysisOutcome::Completed(AnalysisResult::new(0.8)));
    assert_eq!(sentiment.calls_for("great job"), 1);

    // After completion a new request is allowed again
    sentiment.release("great job");
    orchestrator.analyze_item(&id, "great job").await.unwrap();
    assert_eq!(sentiment.calls_for("great job"), 2);
}

#[tokio::test]
async fn test_reload_keeps_in_flight_analysis_of_surviving_item() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8).gate("great job"));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    let first = orchestrator.spawn_analysis(id.clone(), "great job".to_string());
    wait_until(|| orchestrator.result_for(&id).is_pending()).await;

    orchestrator.initialize().await.unwrap();
    assert!(orchestrator.result_for(&id).is_pending());

    let second = orchestrator.analyze_item(&id, "great job").await.unwrap();
    assert_eq!(second, AnalysisOutcome::Suppressed);

    sentiment.release("great job");
    assert_eq!(
        first.await.unwrap().unwrap(),
        AnalysisOutcome::Completed(AnalysisResult::new(0.8))
    );
    assert_eq!(sentiment.calls_for("great job"), 1);
    assert_eq!(
        orchestrator.result_for(&id),
        AnalysisState::Present(AnalysisResult::new(0.8))
    );
}

#[tokio::test]
async fn test_reload_drops_analyses_of_vanished_items() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(
        FakeSentiment::new()
            .score("great job", 0.8)
            .score("please add export", 0.2)
            .gate("great job"),
    );
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let kept = FeedbackId::from("2");
    orchestrator
        .analyze_item(&kept, "please add export")
        .await
        .unwrap();

    let vanished = FeedbackId::from("1");
    let pending = orchestrator.spawn_analysis(vanished.clone(), "great job".to_string());
    wait_until(|| orchestrator.result_for(&vanished).is_pending()).await;

    // Item 1 was removed elsewhere between loads
    dashboard.set_body(Ok(dashboard_body(
        "Ada",
        vec![feedback("2", "p2", "feature", "please add export")],
    )));
    orchestrator.initialize().await.unwrap();
    assert_eq!(orchestrator.result_for(&vanished), AnalysisState::Absent);
    assert!(orchestrator.result_for(&kept).result().is_some());

    sentiment.release("great job");
    assert_eq!(pending.await.unwrap().unwrap(), AnalysisOutcome::Discarded);
    assert_eq!(orchestrator.result_for(&vanished), AnalysisState::Absent);
    assert_eq!(orchestrator.pending_analyses(), 0);
}

#[tokio::test]
async fn test_completion_after_delete_is_discarded() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().score("great job", 0.8).gate("great job"));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    let analysis = orchestrator.spawn_analysis(id.clone(), "great job".to_string());
    wait_until(|| orchestrator.result_for(&id).is_pending()).await;

    orchestrator.delete_item(&PageId::from("p1")).await.unwrap();
    assert_eq!(orchestrator.result_for(&id), AnalysisState::Absent);

    sentiment.release("great job");
    assert_eq!(analysis.await.unwrap().unwrap(), AnalysisOutcome::Discarded);
    assert_eq!(orchestrator.result_for(&id), AnalysisState::Absent);
    assert_eq!(orchestrator.pending_analyses(), 0);
}

#[tokio::test]
async fn test_failure_after_delete_is_not_surfaced() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new().fail("great job").gate("great job"));
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let id = FeedbackId::from("1");
    let analysis = orchestrator.spawn_analysis(id.clone(), "great job".to_string());
    wait_until(|| orchestrator.result_for(&id).is_pending()).await;

    orchestrator.delete_item(&PageId::from("p1")).await.unwrap();
    sentiment.release("great job");
    assert_eq!(analysis.await.unwrap().unwrap(), AnalysisOutcome::Discarded);
}

#[tokio::test]
async fn test_analysis_failure_is_scoped_to_one_item() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(
        FakeSentiment::new()
            .fail("great job")
            .score("please add export", -0.4),
    );
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let failing = FeedbackId::from("1");
    let healthy = FeedbackId::from("2");

    match orchestrator.analyze_item(&failing, "great job").await {
        Err(FeedbackError::AnalysisFailed { id, reason }) => {
            assert_eq!(id, failing);
            assert!(reason.contains("timed out"));
        }
        other => panic!("Expected AnalysisFailed, got {:?}", other),
    }
    assert_eq!(orchestrator.result_for(&failing), AnalysisState::Absent);

    let outcome = orchestrator
        .analyze_item(&healthy, "please add export")
        .await
        .unwrap();
    assert_eq!(outcome, AnalysisOutcome::Completed(AnalysisResult::new(-0.4)));
    assert_eq!(
        orchestrator
            .result_for(&healthy)
            .result()
            .map(|r| r.polarity()),
        Some(Polarity::Negative)
    );
    assert_eq!(orchestrator.canonical().len(), 2);
}

#[tokio::test]
async fn test_independent_items_complete_in_any_order() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(
        FakeSentiment::new()
            .score("great job", 0.8)
            .score("please add export", 0.0)
            .gate("great job")
            .gate("please add export"),
    );
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();

    let first = FeedbackId::from("1");
    let second = FeedbackId::from("2");
    let a = orchestrator.spawn_analysis(first.clone(), "great job".to_string());
    let b = orchestrator.spawn_analysis(second.clone(), "please add export".to_string());
    wait_until(|| orchestrator.pending_analyses() == 2).await;

    // Filtering stays responsive while both are in flight
    orchestrator.change_filter(CategoryFilter::Only(Category::from("feature")));
    assert_eq!(ids(&orchestrator.filtered_view()), vec!["2"]);

    sentiment.release("please add export");
    assert_eq!(
        b.await.unwrap().unwrap(),
        AnalysisOutcome::Completed(AnalysisResult::new(0.0))
    );
    assert!(orchestrator.result_for(&first).is_pending());
    assert_eq!(
        orchestrator.result_for(&second).result().map(|r| r.polarity()),
        Some(Polarity::Neutral)
    );

    sentiment.release("great job");
    a.await.unwrap().unwrap();
    assert_eq!(orchestrator.pending_analyses(), 0);
    assert!(orchestrator.result_for(&first).result().is_some());
}

#[tokio::test]
async fn test_not_authenticated_exposes_no_data() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new());
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();
    assert_eq!(orchestrator.canonical().len(), 2);

    // Session expires; reload is rejected
    dashboard.set_body(Err(ServiceError::Unauthorized));
    let result = orchestrator.initialize().await;
    assert!(matches!(result, Err(FeedbackError::NotAuthenticated)));

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.operator.is_none());
    assert_eq!(snapshot.total, 0);
    assert!(snapshot.rows.is_empty());
    assert!(snapshot.categories.is_empty());
    assert!(!orchestrator.is_initialized());
}

#[tokio::test]
async fn test_malformed_payload_is_load_error() {
    let body = dashboard_body(
        "Ada",
        vec![
            feedback("1", "p1", "bug", "ok"),
            json!({"_id": "2", "category": "bug", "content": "no page", "createdAt": "2025-03-01T10:00:00Z"}),
        ],
    );
    let dashboard = Arc::new(FakeDashboard::with_body(body));
    let sentiment = Arc::new(FakeSentiment::new());
    let orchestrator = orchestrator(&dashboard, &sentiment);

    match orchestrator.initialize().await {
        Err(FeedbackError::LoadError(msg)) => assert!(msg.contains("pageId")),
        other => panic!("Expected LoadError, got {:?}", other),
    }
    assert!(orchestrator.canonical().is_empty());

    // A body without the admin object is also rejected
    dashboard.set_body(Ok(json!({"feedbacks": []})));
    assert!(matches!(
        orchestrator.initialize().await,
        Err(FeedbackError::LoadError(_))
    ));

    let unreachable = Arc::new(FakeDashboard::failing(ServiceError::Network(
        "connection refused".to_string(),
    )));
    let orchestrator = common::orchestrator(&unreachable, &sentiment);
    assert!(matches!(
        orchestrator.initialize().await,
        Err(FeedbackError::LoadError(_))
    ));
}

#[tokio::test]
async fn test_reload_resets_filter() {
    let dashboard = Arc::new(FakeDashboard::with_body(two_item_body()));
    let sentiment = Arc::new(FakeSentiment::new());
    let orchestrator = orchestrator(&dashboard, &sentiment);
    orchestrator.initialize().await.unwrap();
    orchestrator.change_filter(CategoryFilter::Only(Category::from("bug")));

    dashboard.set_body(Ok(dashboard_body(
        "Ada",
        vec![
            feedback("3", "p3", "complaint", "slow"),
            feedback("4", "p3", "general", "hello"),
        ],
    )));
    orchestrator.initialize().await.unwrap();

    assert_eq!(orchestrator.filter(), CategoryFilter::All);
    assert_eq!(ids(&orchestrator.filtered_view()), vec!["3", "4"]);

    // Both items share a page and go together
    assert_eq!(orchestrator.delete_item(&PageId::from("p3")).await.unwrap(), 2);
    assert!(orchestrator.canonical().is_empty());
}
