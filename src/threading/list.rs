//! Render list building.
//!
//! Flattens comment groups into the rows a virtualized list displays,
//! inserting "view replies" / "hide replies" toggle rows according to the
//! caller's [`ExpansionState`].

use serde::Serialize;

use crate::message::Message;

use super::expansion::ExpansionState;
use super::types::CommentGroup;

/// A single row of the render list.
///
/// Rows borrow from the groups they were built from and are rebuilt whenever
/// the groups or the expansion state change. Serializes with a `type` tag
/// (`comment`, `viewReplies`, `hideReplies`, `reply`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ListItem<'a> {
    /// A top-level comment, always shown
    Comment {
        /// The comment
        message: &'a Message,
        /// Number of replies, shown or not
        reply_count: usize,
    },
    /// Toggle row for a collapsed group
    ViewReplies {
        /// Id of the comment whose replies are hidden
        parent_id: &'a str,
        /// The comment whose replies are hidden
        parent: &'a Message,
        /// Number of hidden replies
        count: usize,
    },
    /// Toggle row closing an expanded group
    HideReplies {
        /// Id of the comment whose replies are shown
        parent_id: &'a str,
        /// Number of shown replies
        count: usize,
    },
    /// A reply inside an expanded group
    Reply {
        /// The reply
        message: &'a Message,
        /// The comment it replies to
        parent: &'a Message,
    },
}

impl<'a> ListItem<'a> {
    /// Key that identifies this row across rebuilds.
    pub fn key(&self) -> String {
        match self {
            ListItem::Comment { message, .. } => format!("comment:{}", message.id),
            ListItem::ViewReplies { parent_id, .. } => format!("view:{parent_id}"),
            ListItem::HideReplies { parent_id, .. } => format!("hide:{parent_id}"),
            ListItem::Reply { message, .. } => format!("reply:{}", message.id),
        }
    }

    /// The message shown on this row, if it is not a toggle row.
    pub fn message(&self) -> Option<&'a Message> {
        match self {
            ListItem::Comment { message, .. } | ListItem::Reply { message, .. } => Some(*message),
            ListItem::ViewReplies { .. } | ListItem::HideReplies { .. } => None,
        }
    }

    /// Check if this row is a view/hide toggle.
    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            ListItem::ViewReplies { .. } | ListItem::HideReplies { .. }
        )
    }
}

/// Flatten comment groups into render rows.
///
/// Per group, in order:
/// 1. A `Comment` row, regardless of expansion state
/// 2. If the group has replies and is collapsed, one `ViewReplies` row
/// 3. If the group has replies and is expanded, one `Reply` row per reply
///    followed by one `HideReplies` row
///
/// Toggling one id only changes that group's rows.
pub fn build_list_items<'a>(
    groups: &'a [CommentGroup],
    expanded: &ExpansionState,
) -> Vec<ListItem<'a>> {
    let mut items = Vec::with_capacity(list_len(groups, expanded));

    for group in groups {
        let comment = &group.comment;
        let count = group.reply_count();

        items.push(ListItem::Comment {
            message: comment,
            reply_count: count,
        });

        if count == 0 {
            continue;
        }

        if expanded.is_expanded(&comment.id) {
            items.extend(group.replies.iter().map(|reply| ListItem::Reply {
                message: reply,
                parent: comment,
            }));
            items.push(ListItem::HideReplies {
                parent_id: &comment.id,
                count,
            });
        } else {
            items.push(ListItem::ViewReplies {
                parent_id: &comment.id,
                parent: comment,
                count,
            });
        }
    }

    items
}

/// Number of rows [`build_list_items`] produces, without building them.
pub fn list_len(groups: &[CommentGroup], expanded: &ExpansionState) -> usize {
    groups
        .iter()
        .map(|group| match group.reply_count() {
            0 => 1,
            n if expanded.is_expanded(group.id()) => n + 2,
            _ => 2,
        })
        .sum()
}
