//! Core types produced by grouping.

use crate::message::Message;

use super::expansion::ExpansionState;
use super::list::{build_list_items, ListItem};

/// A top-level comment together with its direct replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// The top-level message
    pub comment: Message,
    /// Replies naming `comment.id`, oldest first
    pub replies: Vec<Message>,
}

impl CommentGroup {
    /// Create a group with no replies.
    pub fn new(comment: Message) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Id of the top-level comment.
    pub fn id(&self) -> &str {
        &self.comment.id
    }

    /// Get the number of replies.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Check if the comment has any replies.
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Iterate over the comment followed by its replies.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        std::iter::once(&self.comment).chain(self.replies.iter())
    }
}

/// Result of grouping a flat message list.
///
/// Recomputed from scratch on every change to the source list; never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedThread {
    /// Top-level comments in creation order, each with its replies
    pub groups: Vec<CommentGroup>,
    /// Every comment followed immediately by its replies
    pub flat: Vec<Message>,
    /// Replies whose parent is not a top-level message and that were left out
    /// of `flat`
    pub orphans: Vec<Message>,
}

impl GroupedThread {
    /// Check if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of top-level comments.
    pub fn comment_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of replies across all groups.
    pub fn reply_count(&self) -> usize {
        self.groups.iter().map(|g| g.reply_count()).sum()
    }

    /// Number of replies left out of `flat`.
    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    /// Find the group whose comment has the given id.
    pub fn find_group(&self, id: &str) -> Option<&CommentGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    /// Ids of comments that have at least one reply.
    pub fn parent_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| g.has_replies())
            .map(|g| g.id())
            .collect()
    }

    /// Flatten the groups into render rows for the given expansion state.
    pub fn list_items<'a>(&'a self, expanded: &ExpansionState) -> Vec<ListItem<'a>> {
        build_list_items(&self.groups, expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::AuthorRef;
    use chrono::{TimeZone, Utc};

    fn make_message(id: &str, minute: u32, reply_to: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            author: AuthorRef::new("u1", "Ada", "ada"),
            content: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
            reply_to: reply_to.map(|s| s.to_string()),
        }
    }

    fn make_thread() -> GroupedThread {
        let c1 = make_message("c1", 0, None);
        let r1 = make_message("r1", 1, Some("c1"));
        let r2 = make_message("r2", 2, Some("c1"));
        let c2 = make_message("c2", 3, None);
        GroupedThread {
            groups: vec![
                CommentGroup {
                    comment: c1.clone(),
                    replies: vec![r1.clone(), r2.clone()],
                },
                CommentGroup::new(c2.clone()),
            ],
            flat: vec![c1, r1, r2, c2],
            orphans: vec![make_message("x1", 4, Some("gone"))],
        }
    }

    #[test]
    fn test_comment_group_counts() {
        let group = CommentGroup::new(make_message("c1", 0, None));
        assert_eq!(group.id(), "c1");
        assert_eq!(group.reply_count(), 0);
        assert!(!group.has_replies());
    }

    #[test]
    fn test_comment_group_iter() {
        let thread = make_thread();
        let ids: Vec<&str> = thread.groups[0].iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "r1", "r2"]);
    }

    #[test]
    fn test_grouped_thread_counts() {
        let thread = make_thread();
        assert!(!thread.is_empty());
        assert_eq!(thread.comment_count(), 2);
        assert_eq!(thread.reply_count(), 2);
        assert_eq!(thread.orphan_count(), 1);
        assert_eq!(thread.parent_ids(), vec!["c1"]);
    }

    #[test]
    fn test_grouped_thread_find_group() {
        let thread = make_thread();
        assert_eq!(thread.find_group("c2").map(|g| g.reply_count()), Some(0));
        assert!(thread.find_group("r1").is_none());
    }

    #[test]
    fn test_grouped_thread_empty() {
        let thread = GroupedThread::default();
        assert!(thread.is_empty());
        assert!(thread.parent_ids().is_empty());
        assert!(thread.list_items(&ExpansionState::new()).is_empty());
    }
}
