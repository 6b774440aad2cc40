//! Relative list moves shared by widget and container reordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a dragged item lands relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
}

impl DropPosition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            _ => None,
        }
    }
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Move `dragged` next to `target`.
///
/// The dragged item is removed first and the target's index is taken from
/// the shortened list, so `Before` lands at that index and `After` one past
/// it. Returns `false` without touching `items` when the two are equal or
/// either is missing.
pub fn move_relative<T: PartialEq>(items: &mut Vec<T>, dragged: &T, target: &T, position: DropPosition) -> bool {
    if dragged == target || !items.contains(target) {
        return false;
    }
    let Some(from) = items.iter().position(|item| item == dragged) else {
        return false;
    };

    let item = items.remove(from);
    let Some(target_index) = items.iter().position(|item| item == target) else {
        items.insert(from, item);
        return false;
    };
    let insert_at = match position {
        DropPosition::Before => target_index,
        DropPosition::After => target_index + 1,
    };
    items.insert(insert_at, item);
    true
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
