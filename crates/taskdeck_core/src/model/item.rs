//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by the store.
//! - Own field normalization and the `updated_at` touch rule.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `title` is never empty or whitespace-only.
//! - `updated_at >= created_at`.
//! - `description` is `None` rather than an empty string.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one item.
pub type ItemId = Uuid;

/// Item validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Nil UUID is reserved and cannot identify an item.
    NilId,
    /// Title is empty after trimming.
    EmptyTitle,
    /// `updated_at` is earlier than `created_at`.
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::EmptyTitle => write!(f, "item title must not be empty"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({updated_at}) must be >= createdAt ({created_at})"
            ),
        }
    }
}

impl Error for ItemValidationError {}

/// One task record.
///
/// Serialized in camelCase to match the persisted slot format. A missing
/// `description` key means "no description".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub archived: bool,
    /// Unix epoch milliseconds. Set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Touched by every field mutation.
    pub updated_at: i64,
}

/// Raw wire shape; validated into [`Item`] on deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    archived: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ItemRecord> for Item {
    type Error = ItemValidationError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let item = Self {
            id: record.id,
            title: record.title,
            description: normalize_description(record.description),
            completed: record.completed,
            archived: record.archived,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        item.validate()?;
        Ok(item)
    }
}

impl Item {
    /// Creates a new open item with a generated id.
    ///
    /// `created_at` and `updated_at` are both set to `now_ms`.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when `title` trims to empty.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        now_ms: i64,
    ) -> Result<Self, ItemValidationError> {
        Self::with_id(Uuid::new_v4(), title, description, now_ms)
    }

    /// Creates a new open item with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: ItemId,
        title: impl Into<String>,
        description: Option<String>,
        now_ms: i64,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id,
            title: title.into(),
            description: normalize_description(description),
            completed: false,
            archived: false,
            created_at: now_ms,
            updated_at: now_ms,
        };
        item.validate()?;
        Ok(item)
    }

    /// Validates model invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if is_blank(&self.title) {
            return Err(ItemValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(ItemValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Records a field mutation at `now_ms`.
    ///
    /// Never moves `updated_at` backwards, so a clock step back cannot break
    /// `updated_at >= created_at`.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = self.updated_at.max(now_ms);
    }
}

/// Returns whether a title would be rejected by the store.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Maps blank descriptions to `None`, the canonical "no description" form.
pub fn normalize_description(value: Option<String>) -> Option<String> {
    value.filter(|text| !is_blank(text))
}
