//! In-memory feedback collection with a derived, filtered view
//!
//! The store holds the canonical collection exactly as it was loaded (insertion
//! order preserved) and keeps two derived values in step with it:
//! - the [`CategoryIndex`] over the canonical collection
//! - the positions of the items matching the active [`CategoryFilter`]
//!
//! Both are recomputed synchronously whenever the collection or the filter
//! changes, so readers never observe a stale view.

use crate::categories::CategoryIndex;
use crate::error::{FeedbackError, Result};
use crate::types::{Category, CategoryFilter, FeedbackId, FeedbackItem, FeedbackRecord, PageId};
use std::collections::HashSet;
use tracing::debug;

/// Canonical collection plus derived filtered view
#[derive(Debug, Clone, Default)]
pub struct FeedbackStore {
    items: Vec<FeedbackItem>,
    filter: CategoryFilter,
    /// Positions in `items` selected by `filter`, ascending
    filtered: Vec<usize>,
    index: CategoryIndex,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canonical collection wholesale and reset the filter to "all"
    ///
    /// Validation is all-or-nothing: a single malformed record or a duplicate
    /// id rejects the whole batch and leaves the store untouched.
    pub fn load<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = FeedbackRecord>,
    {
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            let item = FeedbackItem::try_from(record)?;
            if !seen.insert(item.id.clone()) {
                return Err(FeedbackError::LoadError(format!(
                    "duplicate feedback id '{}'",
                    item.id
                )));
            }
            items.push(item);
        }

        self.replace(items);
        Ok(())
    }

    /// Replace the canonical collection with already-validated items
    pub fn replace(&mut self, items: Vec<FeedbackItem>) {
        debug!("Loading {} feedback items", items.len());
        self.items = items;
        self.filter = CategoryFilter::All;
        self.refresh();
    }

    /// Remove every item whose page id matches, returning the removed items
    ///
    /// Not finding any item is not an error; the returned vector is empty.
    pub fn remove(&mut self, page_id: &PageId) -> Vec<FeedbackItem> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| &item.page_id == page_id);
        self.items = kept;

        if !removed.is_empty() {
            debug!("Removed {} items for page {}", removed.len(), page_id);
            self.refresh();
        }
        removed
    }

    /// Change the active filter and recompute the filtered view
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!("Filter changed to {}", filter);
        self.filter = filter;
        self.refilter();
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Items matching the active filter, in load order
    pub fn filtered_view(&self) -> Vec<&FeedbackItem> {
        self.filtered.iter().map(|&pos| &self.items[pos]).collect()
    }

    /// The unfiltered collection, in load order
    pub fn canonical(&self) -> &[FeedbackItem] {
        &self.items
    }

    /// Distinct categories of the canonical collection
    pub fn categories(&self) -> &[Category] {
        self.index.categories()
    }

    pub fn get(&self, id: &FeedbackId) -> Option<&FeedbackItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &FeedbackId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop everything, including the filter
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    fn refresh(&mut self) {
        self.index = CategoryIndex::from_items(&self.items);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.filter.matches(&item.category))
            .map(|(pos, _)| pos)
            .collect();
    }
}
