//! Grouping algorithm.
//!
//! Turns a flat, unordered list of messages into top-level comments with
//! their direct replies. Threads are one level deep: replies are bucketed by
//! the literal `reply_to` value, without resolving reply chains.

use std::collections::{HashMap, HashSet};

use crate::message::Message;

use super::options::{GroupingOptions, OrphanPolicy, TieBreak};
use super::types::{CommentGroup, GroupedThread};

/// Group messages into comments and replies with the default options.
///
/// Steps:
/// 1. Sorts a copy of the messages by creation time (stable)
/// 2. Splits top-level comments from replies, bucketing replies by parent id
/// 3. Builds one group per top-level comment, in creation order
/// 4. Flattens the groups so each comment is followed by its own replies
///
/// Replies whose parent is not a top-level message never reach `flat`; they
/// are reported in [`GroupedThread::orphans`].
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use reply_threads::message::{AuthorRef, Message};
/// use reply_threads::threading::build_groups;
///
/// let at = |minute| Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap();
/// let message = |id: &str, minute, reply_to: Option<&str>| Message {
///     id: id.to_string(),
///     author: AuthorRef::new("u1", "Ada", "ada"),
///     content: String::new(),
///     created_at: at(minute),
///     reply_to: reply_to.map(str::to_string),
/// };
///
/// let grouped = build_groups(&[
///     message("c1", 1, None),
///     message("c2", 3, None),
///     message("r1", 2, Some("c1")),
/// ]);
///
/// let flat: Vec<&str> = grouped.flat.iter().map(|m| m.id.as_str()).collect();
/// assert_eq!(flat, vec!["c1", "r1", "c2"]);
/// ```
pub fn build_groups(messages: &[Message]) -> GroupedThread {
    build_groups_with(messages, &GroupingOptions::default())
}

/// Group messages into comments and replies.
///
/// Same algorithm as [`build_groups`], with orphan handling and timestamp
/// tie-breaking taken from `options`.
pub fn build_groups_with(messages: &[Message], options: &GroupingOptions) -> GroupedThread {
    group_refs(messages.iter().collect(), options)
}

/// Group borrowed messages, cloning each surfaced message once.
///
/// Lets callers that keep messages inside other structures group them
/// without building an owned snapshot first.
pub(crate) fn group_refs(mut sorted: Vec<&Message>, options: &GroupingOptions) -> GroupedThread {
    if sorted.is_empty() {
        return GroupedThread::default();
    }
    let total = sorted.len();

    // Step 1: Sort by creation time
    match options.tie_break {
        TieBreak::InputOrder => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        TieBreak::MessageId => sorted.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }

    // Step 2: Bucket replies by the literal parent id, in sorted order
    let mut replies_by_parent: HashMap<&str, Vec<&Message>> = HashMap::new();
    let mut top_level_ids: HashSet<&str> = HashSet::new();
    for message in &sorted {
        match message.parent_id() {
            Some(parent_id) => replies_by_parent.entry(parent_id).or_default().push(*message),
            None => {
                top_level_ids.insert(message.id.as_str());
            }
        }
    }

    // Step 3: One group per top-level comment, orphans set aside or promoted
    let mut groups: Vec<CommentGroup> = Vec::with_capacity(top_level_ids.len());
    let mut orphans: Vec<Message> = Vec::new();
    for message in &sorted {
        match message.parent_id() {
            None => {
                let replies = replies_by_parent
                    .get(message.id.as_str())
                    .map(|replies| replies.iter().map(|r| (*r).clone()).collect())
                    .unwrap_or_default();
                groups.push(CommentGroup {
                    comment: (*message).clone(),
                    replies,
                });
            }
            Some(parent_id) if top_level_ids.contains(parent_id) => {}
            Some(_) => match options.orphans {
                OrphanPolicy::Drop => orphans.push((*message).clone()),
                OrphanPolicy::Promote => groups.push(CommentGroup::new((*message).clone())),
            },
        }
    }

    // Step 4: Flatten, comment then its replies
    let flat: Vec<Message> = groups.iter().flat_map(|g| g.iter().cloned()).collect();

    if !orphans.is_empty() {
        let orphan_ids: Vec<&str> = orphans.iter().map(|m| m.id.as_str()).collect();
        tracing::warn!(
            count = orphans.len(),
            ids = ?orphan_ids,
            "replies without a top-level parent left out of thread"
        );
    }
    tracing::debug!(
        messages = total,
        comments = groups.len(),
        flat = flat.len(),
        orphans = orphans.len(),
        "grouped thread"
    );

    GroupedThread {
        groups,
        flat,
        orphans,
    }
}
