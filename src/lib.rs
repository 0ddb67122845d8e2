//! FeedbackHub - operator review of anonymous feedback
//!
//! The core behind the FeedbackHub operator dashboard:
//! - Load the operator's feedback collection from the dashboard backend
//! - Filter it by category without touching the canonical collection
//! - Request sentiment analysis per item, at most one request in flight per item
//! - Delete a page's feedback, updating local state only after the backend agrees
//!
//! # Architecture
//!
//! - **Types**: Feedback items, categories, analysis results
//! - **Store**: Canonical collection, filtered view and category index
//! - **Analysis**: Per-item single-flight analysis registry
//! - **Orchestrator**: Composes the above against the collaborator services
//! - **Services**: Dashboard, sentiment and identity backends (HTTP)
//!
//! # Example
//!
//! ```ignore
//! use feedbackhub_core::{DashboardOrchestrator, FeedbackHubConfig, HttpDashboardService, HttpSentimentService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FeedbackHubConfig::load(None)?;
//!     let orchestrator = DashboardOrchestrator::new(
//!         Arc::new(HttpDashboardService::new(&config.dashboard, &config.http)?),
//!         Arc::new(HttpSentimentService::new(&config.sentiment, &config.http)?),
//!     );
//!
//!     orchestrator.initialize().await?;
//!     orchestrator.change_filter("bug".parse().unwrap());
//!     for row in orchestrator.snapshot().rows {
//!         println!("{}: {}", row.item.category, row.item.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod categories;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use analysis::{AnalysisRegistry, AnalysisState, AnalysisTicket, Settlement};
pub use categories::CategoryIndex;
pub use config::{ConfigError, FeedbackHubConfig};
pub use error::{FeedbackError, Result};
pub use orchestrator::{AnalysisOutcome, DashboardOrchestrator, DashboardRow, DashboardSnapshot};
pub use services::{
    DashboardPayload, DashboardService, HttpDashboardService, HttpIdentityService,
    HttpSentimentService, IdentityService, SentimentService, ServiceError,
};
pub use store::FeedbackStore;
pub use types::{
    AnalysisResult, Category, CategoryFilter, FeedbackId, FeedbackItem, FeedbackRecord, Operator,
    PageId, Polarity, User,
};
