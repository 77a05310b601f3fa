//! Expansion state for reply groups.

use std::collections::HashSet;

/// Whether a comment's replies are shown inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyVisibility {
    /// Replies hidden behind a "view replies" row (initial state)
    #[default]
    Collapsed,
    /// Replies shown, followed by a "hide replies" row
    Expanded,
}

/// Set of parent ids whose replies are currently shown.
///
/// Every id starts out collapsed, including ids never seen before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    /// Create an empty state where every group is collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the replies of `parent_id` are shown.
    pub fn is_expanded(&self, parent_id: &str) -> bool {
        self.expanded.contains(parent_id)
    }

    /// Current visibility of the replies of `parent_id`.
    pub fn visibility(&self, parent_id: &str) -> ReplyVisibility {
        if self.is_expanded(parent_id) {
            ReplyVisibility::Expanded
        } else {
            ReplyVisibility::Collapsed
        }
    }

    /// Show the replies of `parent_id`. Returns true if the state changed.
    pub fn expand(&mut self, parent_id: impl Into<String>) -> bool {
        self.expanded.insert(parent_id.into())
    }

    /// Hide the replies of `parent_id`. Returns true if the state changed.
    pub fn collapse(&mut self, parent_id: &str) -> bool {
        self.expanded.remove(parent_id)
    }

    /// Flip the visibility of `parent_id` and return the new state.
    pub fn toggle(&mut self, parent_id: &str) -> ReplyVisibility {
        if self.collapse(parent_id) {
            ReplyVisibility::Collapsed
        } else {
            self.expanded.insert(parent_id.to_string());
            ReplyVisibility::Expanded
        }
    }

    /// Collapse every group.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// Number of expanded groups.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Check if every group is collapsed.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Iterate over the expanded parent ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(|s| s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<HashSet<String>> for ExpansionState {
    fn from(expanded: HashSet<String>) -> Self {
        Self { expanded }
    }
}
