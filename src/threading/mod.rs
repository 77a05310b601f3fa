//! Comment/reply grouping for message threads.
//!
//! This module turns the flat message list of a thread into what a list
//! screen renders:
//!
//! - **Grouping**: top-level comments in creation order, each with its direct
//!   replies ([`build_groups`])
//! - **Flattening**: render rows with "view replies" / "hide replies" toggles
//!   driven by an [`ExpansionState`] ([`build_list_items`])
//!
//! Both steps are pure and total. Callers rerun them against the complete
//! current message list after every change instead of patching earlier
//! output.
//!
//! # Overview
//!
//! - [`CommentGroup`]: A top-level comment and its replies
//! - [`GroupedThread`]: Groups, the flat comment-then-replies view, and
//!   replies that could not be placed
//! - [`ExpansionState`]: Which groups currently show their replies
//! - [`ListItem`]: One render row
//! - [`GroupingOptions`]: Orphan handling and timestamp tie-breaking
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use reply_threads::message::{AuthorRef, Message};
//! use reply_threads::threading::{build_groups, ExpansionState};
//!
//! let message = |id: &str, minute, reply_to: Option<&str>| Message {
//!     id: id.to_string(),
//!     author: AuthorRef::new("u1", "Ada", "ada"),
//!     content: String::new(),
//!     created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
//!     reply_to: reply_to.map(str::to_string),
//! };
//!
//! let grouped = build_groups(&[
//!     message("c1", 1, None),
//!     message("c2", 3, None),
//!     message("r1", 2, Some("c1")),
//! ]);
//!
//! let mut expanded = ExpansionState::new();
//! let rows: Vec<String> = grouped.list_items(&expanded).iter().map(|i| i.key()).collect();
//! assert_eq!(rows, vec!["comment:c1", "view:c1", "comment:c2"]);
//!
//! expanded.expand("c1");
//! let rows: Vec<String> = grouped.list_items(&expanded).iter().map(|i| i.key()).collect();
//! assert_eq!(rows, vec!["comment:c1", "reply:r1", "hide:c1", "comment:c2"]);
//! ```

mod algorithm;
mod expansion;
mod list;
mod options;
mod types;

// Re-export public types
pub use algorithm::{build_groups, build_groups_with};
pub(crate) use algorithm::group_refs;
pub use expansion::{ExpansionState, ReplyVisibility};
pub use list::{build_list_items, list_len, ListItem};
pub use options::{GroupingOptions, OrphanPolicy, TieBreak};
pub use types::{CommentGroup, GroupedThread};
