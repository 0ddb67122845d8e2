//! Dashboard orchestration
//!
//! Composes the feedback store, category index and analysis registry behind
//! the operations an operator performs: load the dashboard, change the
//! category filter, delete a page's feedback and analyse individual items.
//!
//! # Concurrency
//!
//! All state lives in one [`DashboardSession`] behind a mutex that is only
//! ever held across synchronous sections. Remote calls happen with the lock
//! released, so an analysis in flight for one item never blocks filter changes,
//! deletions or analyses of other items. The orchestrator is cheap to clone;
//! [`DashboardOrchestrator::spawn_analysis`] runs one task per analysis.

use crate::analysis::{AnalysisRegistry, AnalysisState, AnalysisTicket, Settlement};
use crate::error::{FeedbackError, Result};
use crate::services::{DashboardService, SentimentService, ServiceError};
use crate::store::FeedbackStore;
use crate::types::{AnalysisResult, Category, CategoryFilter, FeedbackId, FeedbackItem, Operator, PageId};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The operator's view of the feedback collection
///
/// Holds nothing until a dashboard load succeeds; a failed load empties it.
#[derive(Debug, Default)]
pub struct DashboardSession {
    operator: Option<Operator>,
    store: FeedbackStore,
    analyses: AnalysisRegistry,
}

impl DashboardSession {
    fn reset(&mut self) {
        self.operator = None;
        self.store.clear();
        self.analyses.clear();
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.operator.is_none() {
            return Err(FeedbackError::NotAuthenticated);
        }
        Ok(())
    }
}

/// How an `analyze_item` call ended, when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The result was stored for the item
    Completed(AnalysisResult),
    /// Another analysis for the item was already in flight; nothing was sent
    Suppressed,
    /// The item was deleted while the request was in flight
    Discarded,
}

/// One rendered row: an item and its analysis state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub item: FeedbackItem,
    pub analysis: AnalysisState,
}

/// Read-only state for an operator-facing view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub operator: Option<String>,
    pub filter: String,
    pub categories: Vec<Category>,
    /// Size of the canonical collection
    pub total: usize,
    /// Filtered view, in load order
    pub rows: Vec<DashboardRow>,
}

/// Pending analysis that aborts itself if its owner is dropped mid-request
struct InFlight {
    session: Arc<Mutex<DashboardSession>>,
    ticket: Option<AnalysisTicket>,
}

impl InFlight {
    fn finish<F>(mut self, settle: F) -> Settlement
    where
        F: FnOnce(&mut AnalysisRegistry, AnalysisTicket) -> Settlement,
    {
        match self.ticket.take() {
            Some(ticket) => settle(&mut lock_session(&self.session).analyses, ticket),
            None => Settlement::Discarded,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            debug!("Analysis for {} dropped before completion", ticket.id());
            let _ = lock_session(&self.session).analyses.abort(ticket);
        }
    }
}

// Session mutations never panic halfway through, so a poisoned lock still
// guards consistent state.
fn lock_session(session: &Mutex<DashboardSession>) -> MutexGuard<'_, DashboardSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives the dashboard against the external collaborators
#[derive(Clone)]
pub struct DashboardOrchestrator {
    dashboard: Arc<dyn DashboardService>,
    sentiment: Arc<dyn SentimentService>,
    session: Arc<Mutex<DashboardSession>>,
}

impl DashboardOrchestrator {
    pub fn new(dashboard: Arc<dyn DashboardService>, sentiment: Arc<dyn SentimentService>) -> Self {
        Self {
            dashboard,
            sentiment,
            session: Arc::new(Mutex::new(DashboardSession::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardSession> {
        lock_session(&self.session)
    }

    /// Load the operator identity and feedback collection
    ///
    /// Any failure leaves the session empty: `NotAuthenticated` when the
    /// backend rejects the session, `LoadError` for everything else.
    pub async fn initialize(&self) -> Result<Operator> {
        let fetched = self.dashboard.fetch_dashboard().await;

        let mut session = self.lock();
        let payload = match fetched {
            Ok(payload) => payload,
            Err(ServiceError::Unauthorized) => {
                warn!("Dashboard rejected the session");
                session.reset();
                return Err(FeedbackError::NotAuthenticated);
            }
            Err(e) => {
                warn!("Dashboard load failed: {}", e);
                session.reset();
                return Err(FeedbackError::LoadError(e.to_string()));
            }
        };

        if let Err(e) = session.store.load(payload.feedbacks) {
            warn!("Dashboard payload rejected: {}", e);
            session.reset();
            return Err(e);
        }

        // Analyses of items that survived the reload stay pending or present
        let state = &mut *session;
        state.analyses.retain(|id| state.store.contains(id));
        state.operator = Some(payload.admin.clone());
        info!(
            "Dashboard loaded for {}: {} feedback items",
            payload.admin.name,
            session.store.len()
        );
        Ok(payload.admin)
    }

    /// Change the category filter; synchronous, no I/O
    pub fn change_filter(&self, filter: CategoryFilter) {
        self.lock().store.set_filter(filter);
    }

    /// Delete every item collected through `page_id`
    ///
    /// Local state changes only after the backend confirms; on failure nothing
    /// changes and the operator may retry. Returns the number of items removed.
    pub async fn delete_item(&self, page_id: &PageId) -> Result<usize> {
        self.lock().ensure_loaded()?;

        if let Err(e) = self.dashboard.delete_feedback(page_id).await {
            warn!("Deletion of page {} failed: {}", page_id, e);
            return Err(FeedbackError::DeletionFailed {
                page_id: page_id.clone(),
                reason: e.to_string(),
            });
        }

        let mut session = self.lock();
        let removed = session.store.remove(page_id);
        for item in &removed {
            session.analyses.forget(&item.id);
        }
        info!("Removed {} items for page {}", removed.len(), page_id);
        Ok(removed.len())
    }

    /// Request sentiment analysis of `content` for item `id`
    ///
    /// A second call for the same id while one is in flight sends nothing and
    /// returns [`AnalysisOutcome::Suppressed`]. A result that arrives after
    /// the item was deleted is dropped ([`AnalysisOutcome::Discarded`]).
    pub async fn analyze_item(&self, id: &FeedbackId, content: &str) -> Result<AnalysisOutcome> {
        let in_flight = match self.begin_analysis(id)? {
            Some(in_flight) => in_flight,
            None => return Ok(AnalysisOutcome::Suppressed),
        };

        match self.sentiment.analyze(content).await {
            Ok(result) => {
                let stored = result.clone();
                match in_flight.finish(|registry, ticket| registry.complete(ticket, stored)) {
                    Settlement::Applied => {
                        info!(
                            "Feedback {} analysed: {} ({})",
                            id,
                            result.polarity().label(),
                            result.formatted_score()
                        );
                        Ok(AnalysisOutcome::Completed(result))
                    }
                    Settlement::Discarded => Ok(AnalysisOutcome::Discarded),
                }
            }
            Err(e) => match in_flight.finish(|registry, ticket| registry.abort(ticket)) {
                Settlement::Applied => {
                    warn!("Analysis of {} failed: {}", id, e);
                    Err(FeedbackError::AnalysisFailed {
                        id: id.clone(),
                        reason: e.to_string(),
                    })
                }
                Settlement::Discarded => Ok(AnalysisOutcome::Discarded),
            },
        }
    }

    /// Run `analyze_item` on its own task
    pub fn spawn_analysis(
        &self,
        id: FeedbackId,
        content: String,
    ) -> JoinHandle<Result<AnalysisOutcome>> {
        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.analyze_item(&id, &content).await })
    }

    fn begin_analysis(&self, id: &FeedbackId) -> Result<Option<InFlight>> {
        let mut session = self.lock();
        session.ensure_loaded()?;
        if !session.store.contains(id) {
            return Err(FeedbackError::FeedbackNotFound(id.clone()));
        }

        match session.analyses.begin(id) {
            Ok(ticket) => Ok(Some(InFlight {
                session: Arc::clone(&self.session),
                ticket: Some(ticket),
            })),
            Err(FeedbackError::AlreadyInFlight(_)) => {
                debug!("Analysis for {} already in flight, suppressing", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().operator.is_some()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.lock().operator.clone()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.lock().store.filter().clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().store.categories().to_vec()
    }

    pub fn filtered_view(&self) -> Vec<FeedbackItem> {
        self.lock().store.filtered_view().into_iter().cloned().collect()
    }

    pub fn canonical(&self) -> Vec<FeedbackItem> {
        self.lock().store.canonical().to_vec()
    }

    pub fn item(&self, id: &FeedbackId) -> Option<FeedbackItem> {
        self.lock().store.get(id).cloned()
    }

    pub fn result_for(&self, id: &FeedbackId) -> AnalysisState {
        self.lock().analyses.result_for(id)
    }

    /// Number of analyses currently in flight
    pub fn pending_analyses(&self) -> usize {
        self.lock().analyses.pending_count()
    }

    /// Everything a view needs, captured under one lock
    pub fn snapshot(&self) -> DashboardSnapshot {
        let session = self.lock();
        let rows = session
            .store
            .filtered_view()
            .into_iter()
            .map(|item| DashboardRow {
                item: item.clone(),
                analysis: session.analyses.result_for(&item.id),
            })
            .collect();

        DashboardSnapshot {
            operator: session.operator.as_ref().map(|op| op.name.clone()),
            filter: session.store.filter().to_string(),
            categories: session.store.categories().to_vec(),
            total: session.store.len(),
            rows,
        }
    }
}
