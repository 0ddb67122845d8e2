//! Error types for the FeedbackHub review core
//!
//! This module provides the operator-facing error taxonomy using thiserror.
//! Transport failures never surface here directly: collaborators report a
//! [`ServiceError`](crate::services::ServiceError) and the orchestrator
//! translates it into one of the variants below.

use crate::config::ConfigError;
use crate::types::{FeedbackId, PageId};
use thiserror::Error;

/// Main error type for FeedbackHub operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// The dashboard service reported that the operator is not signed in
    #[error("Not authenticated: please register or log in to proceed")]
    NotAuthenticated,

    /// The dashboard payload was malformed or could not be fetched
    #[error("Failed to load dashboard: {0}")]
    LoadError(String),

    /// The backend refused or failed the deletion; local state is untouched
    #[error("Failed to delete feedback {page_id}: {reason}")]
    DeletionFailed { page_id: PageId, reason: String },

    /// An analysis for this item is already pending
    #[error("Analysis already in flight for feedback {0}")]
    AlreadyInFlight(FeedbackId),

    /// The sentiment service failed for one item
    #[error("Sentiment analysis failed for feedback {id}: {reason}")]
    AnalysisFailed { id: FeedbackId, reason: String },

    /// Item is not part of the loaded collection
    #[error("Feedback not found: {0}")]
    FeedbackNotFound(FeedbackId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FeedbackError {
    /// Errors that block the whole dashboard (as opposed to a single row)
    pub fn is_fatal_to_view(&self) -> bool {
        matches!(
            self,
            FeedbackError::NotAuthenticated | FeedbackError::LoadError(_)
        )
    }
}

/// Result type alias for FeedbackHub operations
pub type Result<T> = std::result::Result<T, FeedbackError>;
