//! Per-item sentiment analysis registry
//!
//! Tracks, for each feedback id, the last completed [`AnalysisResult`] and
//! whether a request is currently in flight. The registry enforces
//! single-flight per id: a second `begin` while one is pending is rejected,
//! never queued.
//!
//! # State machine
//!
//! ```text
//! Absent --begin--> Pending --complete--> Present
//!                      |  \--abort-----> Absent (or the previous Present)
//!                      \--forget-------> Absent
//! Present --begin--> Pending
//! ```
//!
//! Every `begin` hands out an [`AnalysisTicket`] stamped with a generation.
//! `complete` and `abort` only take effect when the ticket still matches the
//! pending request, so a result arriving after `forget` (the item was deleted)
//! is discarded instead of resurrecting the entry.

use crate::error::{FeedbackError, Result};
use crate::types::{AnalysisResult, FeedbackId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Observable analysis state of one item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "result")]
pub enum AnalysisState {
    /// Never analysed, or purged
    Absent,
    /// A request is in flight
    Pending,
    /// Last completed result
    Present(AnalysisResult),
}

impl AnalysisState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AnalysisState::Pending)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Present(result) => Some(result),
            _ => None,
        }
    }
}

/// Handle for one in-flight analysis, consumed by `complete` or `abort`
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an analysis ticket must be completed or aborted"]
pub struct AnalysisTicket {
    id: FeedbackId,
    generation: u64,
}

impl AnalysisTicket {
    pub fn id(&self) -> &FeedbackId {
        &self.id
    }
}

/// What happened to a ticket handed back to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The registry accepted the outcome
    Applied,
    /// The entry was forgotten or superseded; the outcome was dropped
    Discarded,
}

#[derive(Debug, Default)]
struct Entry {
    /// Generation of the in-flight request, if any
    pending: Option<u64>,
    result: Option<AnalysisResult>,
}

/// Analysis results and in-flight markers, keyed by feedback id
#[derive(Debug, Default)]
pub struct AnalysisRegistry {
    entries: HashMap<FeedbackId, Entry>,
    next_generation: u64,
}

impl AnalysisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` pending, or fail with `AlreadyInFlight`
    pub fn begin(&mut self, id: &FeedbackId) -> Result<AnalysisTicket> {
        let entry = self.entries.entry(id.clone()).or_default();
        if entry.pending.is_some() {
            return Err(FeedbackError::AlreadyInFlight(id.clone()));
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        entry.pending = Some(generation);
        debug!("Analysis {} started for {}", generation, id);

        Ok(AnalysisTicket {
            id: id.clone(),
            generation,
        })
    }

    /// Store `result` as the current result and clear the pending flag
    pub fn complete(&mut self, ticket: AnalysisTicket, result: AnalysisResult) -> Settlement {
        match self.settle(&ticket) {
            Some(entry) => {
                entry.result = Some(result);
                debug!("Analysis {} completed for {}", ticket.generation, ticket.id);
                Settlement::Applied
            }
            None => {
                debug!(
                    "Discarding analysis {} for {}: no longer pending",
                    ticket.generation, ticket.id
                );
                Settlement::Discarded
            }
        }
    }

    /// Clear the pending flag without storing a result
    ///
    /// A result from an earlier completed analysis is kept.
    pub fn abort(&mut self, ticket: AnalysisTicket) -> Settlement {
        let settled = self.settle(&ticket).map(|entry| entry.result.is_none());
        match settled {
            Some(now_empty) => {
                if now_empty {
                    self.entries.remove(&ticket.id);
                }
                debug!("Analysis {} aborted for {}", ticket.generation, ticket.id);
                Settlement::Applied
            }
            None => Settlement::Discarded,
        }
    }

    /// Current state for `id`
    pub fn result_for(&self, id: &FeedbackId) -> AnalysisState {
        match self.entries.get(id) {
            Some(Entry {
                pending: Some(_), ..
            }) => AnalysisState::Pending,
            Some(Entry {
                result: Some(result),
                ..
            }) => AnalysisState::Present(result.clone()),
            _ => AnalysisState::Absent,
        }
    }

    /// Purge any entry for `id`, pending or completed
    pub fn forget(&mut self, id: &FeedbackId) -> bool {
        let existed = self.entries.remove(id).is_some();
        if existed {
            debug!("Forgot analysis state for {}", id);
        }
        existed
    }

    /// Keep only the entries whose id satisfies `keep`, pending or not
    ///
    /// Dropped entries behave as if forgotten: their tickets settle as
    /// `Discarded`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&FeedbackId) -> bool,
    {
        self.entries.retain(|id, _| keep(id));
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of ids with an analysis in flight
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.pending.is_some())
            .count()
    }

    /// Number of ids with any entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn settle(&mut self, ticket: &AnalysisTicket) -> Option<&mut Entry> {
        let entry = self.entries.get_mut(&ticket.id)?;
        if entry.pending != Some(ticket.generation) {
            return None;
        }
        entry.pending = None;
        Some(entry)
    }
}
