//! Derived list views over the item collection.
//!
//! Filters are pure predicates; nothing about the active filter is stored
//! or persisted by core.

use crate::model::item::Item;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Named view over the collection.
///
/// `All` means "everything not archived". Archive acts as a soft hide, so
/// archived items only show up under `Archived`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Archived,
}

impl Filter {
    /// Every filter in display order.
    pub const ALL: [Filter; 4] = [
        Filter::All,
        Filter::Active,
        Filter::Completed,
        Filter::Archived,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Returns whether `item` belongs to this view.
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => !item.archived,
            Self::Active => !item.completed && !item.archived,
            Self::Completed => item.completed && !item.archived,
            Self::Archived => item.archived,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter name parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|active|completed|archived",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

/// Returns items matching `filter`, preserving collection order.
pub fn apply(items: &[Item], filter: Filter) -> Vec<&Item> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Per-view item counts, as shown next to each filter tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
    pub archived: usize,
}

impl FilterCounts {
    /// Counts every view in a single pass.
    pub fn tally(items: &[Item]) -> Self {
        let mut counts = Self::default();
        for item in items {
            if item.archived {
                counts.archived += 1;
                continue;
            }
            counts.all += 1;
            if item.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
        }
        counts
    }

    /// Count for one filter.
    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
            Filter::Archived => self.archived,
        }
    }
}
