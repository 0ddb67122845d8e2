//! Core data types for the FeedbackHub review core
//!
//! This module defines the feedback items an operator reviews, the category
//! filter applied to them, and the sentiment results attached on demand.
//! Wire-level records (`FeedbackRecord`) are kept separate from validated
//! items (`FeedbackItem`) so malformed payloads are rejected at load time.

use crate::error::FeedbackError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the feedback backend at submission time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

impl FeedbackId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeedbackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FeedbackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the feedback-collection link that produced an item
///
/// Distinct from [`FeedbackId`]: several items can share a page, and deletion
/// is keyed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categories the backend is known to emit
pub const KNOWN_CATEGORIES: [&str; 5] = ["bug", "feature", "improvement", "general", "complaint"];

/// Feedback category as defined by the backend
///
/// Kept as an open string: the backend owns the enumeration and may add
/// values this crate has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label with the first letter upper-cased (`bug` -> `Bug`)
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether this is one of [`KNOWN_CATEGORIES`]
    pub fn is_known(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.0.as_str())
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Active category filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering: the whole canonical collection
    #[default]
    All,
    /// Only items with exactly this category
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("category filter cannot be empty".to_string());
        }
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(Category::new(trimmed)))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

/// A validated feedback item; every field is immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: FeedbackId,
    #[serde(rename = "pageId")]
    pub page_id: PageId,
    pub category: Category,
    /// Free-text body, never interpreted by this crate
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Backend ids arrive as strings (document ids) or plain integers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for FeedbackId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => FeedbackId(s),
            RawId::Number(n) => FeedbackId(n.to_string()),
        }
    }
}

/// Feedback item exactly as the dashboard endpoint returns it
///
/// All fields are optional here; [`FeedbackItem::try_from`] enforces presence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRecord {
    /// Document id (`_id`)
    #[serde(rename = "_id", default)]
    pub doc_id: Option<RawId>,
    /// Plain id; only consulted when `_id` is absent
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(rename = "pageId", default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, FeedbackError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(FeedbackError::LoadError(format!(
            "feedback record is missing required field '{}'",
            field
        ))),
    }
}

impl TryFrom<FeedbackRecord> for FeedbackItem {
    type Error = FeedbackError;

    fn try_from(record: FeedbackRecord) -> Result<Self, Self::Error> {
        let id = match record.doc_id.or(record.id) {
            Some(RawId::Text(s)) => FeedbackId(required_text(Some(s), "_id")?),
            Some(raw @ RawId::Number(_)) => FeedbackId::from(raw),
            None => {
                return Err(FeedbackError::LoadError(
                    "feedback record is missing required field '_id'".to_string(),
                ))
            }
        };
        let page_id = PageId(required_text(record.page_id, "pageId")?);
        let category = Category(required_text(record.category, "category")?);
        let content = record.content.ok_or_else(|| {
            FeedbackError::LoadError(format!(
                "feedback record {} is missing required field 'content'",
                id
            ))
        })?;
        let created_at = record.created_at.ok_or_else(|| {
            FeedbackError::LoadError(format!(
                "feedback record {} is missing required field 'createdAt'",
                id
            ))
        })?;

        Ok(FeedbackItem {
            id,
            page_id,
            category,
            content,
            created_at,
        })
    }
}

/// The signed-in operator, as reported by the dashboard endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A signed-in user, as reported by the identity endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Sign of a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Polarity::Positive
        } else if score < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Polarity::Positive => "Positive",
            Polarity::Negative => "Negative",
            Polarity::Neutral => "Neutral",
        }
    }
}

/// Result of one completed sentiment analysis
///
/// Only `score` is interpreted; any other fields the classifier returns are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisResult {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            extra: serde_json::Map::new(),
        }
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_score(self.score)
    }

    /// Score rendered with two decimals, e.g. `0.80`
    pub fn formatted_score(&self) -> String {
        format!("{:.2}", self.score)
    }
}
