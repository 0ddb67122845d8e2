//! Collaborator services for the FeedbackHub review core
//!
//! The orchestrator only ever talks to these traits. HTTP implementations live
//! alongside; tests substitute in-memory fakes.
//!
//! Every method reports failures as [`ServiceError`], a transport-level
//! classification. Translation into the operator-facing taxonomy happens in
//! the orchestrator, so no raw transport error reaches the store or registry.

pub mod dashboard;
pub mod http;
pub mod identity;
pub mod sentiment;

use crate::types::{AnalysisResult, FeedbackRecord, Operator, PageId, User};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use dashboard::HttpDashboardService;
pub use identity::HttpIdentityService;
pub use sentiment::HttpSentimentService;

/// Transport-level failure reported by a collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// 401/403: the session is missing or expired
    #[error("not authenticated")]
    Unauthorized,

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Body of `GET /api/admin/dashboard`
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardPayload {
    pub admin: Operator,
    pub feedbacks: Vec<FeedbackRecord>,
}

/// Operator dashboard and deletion endpoints
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Fetch the operator identity and feedback collection in one request
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, ServiceError>;

    /// Delete all feedback collected through `page_id`
    async fn delete_feedback(&self, page_id: &PageId) -> Result<(), ServiceError>;
}

/// External sentiment classifier
#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError>;
}

/// Session lookup used outside the dashboard
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// The signed-in user, or `None` when the session is not authenticated
    async fn current_user(&self) -> Result<Option<User>, ServiceError>;

    async fn logout(&self) -> Result<(), ServiceError>;
}
