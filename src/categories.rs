//! Distinct category set of a feedback collection

use crate::types::{Category, FeedbackItem};
use std::collections::HashSet;

/// Categories present in a collection, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<Category>,
}

impl CategoryIndex {
    /// Derive the index from a collection; pure function of `items`
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a FeedbackItem>,
    {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for item in items {
            if seen.insert(&item.category) {
                categories.push(item.category.clone());
            }
        }

        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
