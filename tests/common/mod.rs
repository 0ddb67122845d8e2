//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use feedbackhub_core::{
    AnalysisResult, DashboardOrchestrator, DashboardPayload, DashboardService, PageId,
    SentimentService, ServiceError,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// One feedback record in the dashboard wire format
pub fn feedback(id: &str, page_id: &str, category: &str, content: &str) -> Value {
    json!({
        "_id": id,
        "pageId": page_id,
        "category": category,
        "content": content,
        "createdAt": "2025-03-01T10:00:00Z"
    })
}

/// `{ admin, feedbacks }` dashboard body
pub fn dashboard_body(admin: &str, feedbacks: Vec<Value>) -> Value {
    json!({
        "admin": {"name": admin, "email": "ops@example.com"},
        "feedbacks": feedbacks
    })
}

/// The two-item collection used by most scenarios
pub fn two_item_body() -> Value {
    dashboard_body(
        "Ada",
        vec![
            feedback("1", "p1", "bug", "great job"),
            feedback("2", "p2", "feature", "please add export"),
        ],
    )
}

/// In-memory dashboard backend
pub struct FakeDashboard {
    fetch: Mutex<Result<Value, ServiceError>>,
    delete_error: Mutex<Option<ServiceError>>,
    deleted: Mutex<Vec<PageId>>,
}

impl FakeDashboard {
    pub fn with_body(body: Value) -> Self {
        Self {
            fetch: Mutex::new(Ok(body)),
            delete_error: Mutex::new(None),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            fetch: Mutex::new(Err(error)),
            delete_error: Mutex::new(None),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn set_body(&self, body: Result<Value, ServiceError>) {
        *self.fetch.lock().unwrap() = body;
    }

    pub fn fail_deletes_with(&self, error: Option<ServiceError>) {
        *self.delete_error.lock().unwrap() = error;
    }

    pub fn deleted(&self) -> Vec<PageId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardService for FakeDashboard {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, ServiceError> {
        let body = self.fetch.lock().unwrap().clone()?;
        serde_json::from_value(body).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn delete_feedback(&self, page_id: &PageId) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        if let Some(error) = self.delete_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.deleted.lock().unwrap().push(page_id.clone());
        Ok(())
    }
}

/// In-memory sentiment classifier
///
/// Scores are looked up by text. A text can be gated, in which case its
/// request stays in flight until `release` is called.
#[derive(Default)]
pub struct FakeSentiment {
    scores: Mutex<HashMap<String, f64>>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSentiment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(self, text: &str, score: f64) -> Self {
        self.scores.lock().unwrap().insert(text.to_string(), score);
        self
    }

    pub fn fail(self, text: &str) -> Self {
        self.failing.lock().unwrap().insert(text.to_string());
        self
    }

    /// Hold requests for `text` until released
    pub fn gate(self, text: &str) -> Self {
        self.gates
            .lock()
            .unwrap()
            .insert(text.to_string(), Arc::new(Notify::new()));
        self
    }

    pub fn release(&self, text: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(text) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls().iter().filter(|t| t.as_str() == text).count()
    }
}

#[async_trait]
impl SentimentService for FakeSentiment {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        self.calls.lock().unwrap().push(text.to_string());

        let gate = self.gates.lock().unwrap().get(text).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(text) {
            return Err(ServiceError::Network("request timed out".to_string()));
        }
        let score = self.scores.lock().unwrap().get(text).copied().unwrap_or(0.0);
        Ok(AnalysisResult::new(score))
    }
}

pub fn orchestrator(
    dashboard: &Arc<FakeDashboard>,
    sentiment: &Arc<FakeSentiment>,
) -> DashboardOrchestrator {
    DashboardOrchestrator::new(dashboard.clone(), sentiment.clone())
}

/// Yield to spawned tasks until `condition` holds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}
