//! Thread session state.
//!
//! [`ThreadSession`] owns everything a thread screen mutates: the
//! authoritative message list (server-confirmed plus optimistic sends still in
//! flight) and the expansion state. Grouping is always recomputed from the
//! full snapshot, so the render list cannot drift from the source list no
//! matter how mutations interleave.
//!
//! Sends are sans-io: [`ThreadSession::begin_send`] records a pending entry
//! and hands back the draft to transmit; the caller reports the outcome with
//! [`ThreadSession::confirm_send`] or [`ThreadSession::fail_send`]. Pending
//! entries are reconciled by correlation id, never by position, so several
//! sends can be in flight at once.
//!
//! Every change to a confirmed message bumps the session's generation. A
//! fetch that started at generation `g` is applied with
//! [`ThreadSession::load_since`], which keeps local changes made after `g`
//! instead of rolling them back to the older snapshot.
//!
//! ```
//! use reply_threads::message::{AuthorRef, DraftBuilder};
//! use reply_threads::session::ThreadSession;
//!
//! let mut session = ThreadSession::new("post-1");
//! let draft = DraftBuilder::new()
//!     .author(AuthorRef::new("u1", "Ada", "ada"))
//!     .content("First!")
//!     .build()
//!     .unwrap();
//!
//! let send = session.begin_send(draft).unwrap();
//! assert!(session.is_pending(&send.correlation_id.to_string()));
//!
//! // The provisional message renders straight away
//! assert_eq!(session.grouped().flat.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::message::{Message, MessageDraft};
use crate::threading::{
    group_refs, ExpansionState, GroupedThread, GroupingOptions, ReplyVisibility,
};

/// Session-local id tying an optimistic message to its confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationId(u64);

impl CorrelationId {
    /// Wrap a raw sequence number.
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Get the raw sequence number.
    pub fn seq(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending-{}", self.0)
    }
}

/// An optimistic message waiting for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Correlation id of the send
    pub correlation_id: CorrelationId,
    /// Provisional message, with the correlation id as its id
    pub message: Message,
    /// Draft that was handed to the backend
    pub draft: MessageDraft,
}

/// One entry of the session's message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadEntry {
    /// Sent locally, not yet confirmed
    Pending(PendingMessage),
    /// Known to the backend
    Confirmed(Message),
}

impl ThreadEntry {
    /// The message to display for this entry.
    pub fn message(&self) -> &Message {
        match self {
            ThreadEntry::Pending(pending) => &pending.message,
            ThreadEntry::Confirmed(message) => message,
        }
    }

    /// Check if this entry is still waiting for the backend.
    pub fn is_pending(&self) -> bool {
        matches!(self, ThreadEntry::Pending(_))
    }

    fn correlation_id(&self) -> Option<CorrelationId> {
        match self {
            ThreadEntry::Pending(pending) => Some(pending.correlation_id),
            ThreadEntry::Confirmed(_) => None,
        }
    }
}

/// A send started with [`ThreadSession::begin_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Id to pass back to `confirm_send` / `fail_send`
    pub correlation_id: CorrelationId,
    /// Draft to transmit
    pub draft: MessageDraft,
}

/// Caller-owned state of one thread screen.
#[derive(Debug, Clone)]
pub struct ThreadSession {
    thread_id: String,
    entries: Vec<ThreadEntry>,
    expansion: ExpansionState,
    options: GroupingOptions,
    next_seq: u64,
    generation: u64,
    // Message id -> generation of its last local change
    changed: HashMap<String, u64>,
}

impl ThreadSession {
    /// Create an empty session for a thread.
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self::with_options(thread_id, GroupingOptions::default())
    }

    /// Create an empty session with custom grouping options.
    pub fn with_options(thread_id: impl Into<String>, options: GroupingOptions) -> Self {
        Self {
            thread_id: thread_id.into(),
            entries: Vec::new(),
            expansion: ExpansionState::new(),
            options,
            next_seq: 1,
            generation: 0,
            changed: HashMap::new(),
        }
    }

    /// Get the thread id.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Get the grouping options.
    pub fn options(&self) -> &GroupingOptions {
        &self.options
    }

    /// Get the expansion state.
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Get all entries, in the order they were added.
    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    /// Number of sends still in flight.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Check if the message with this id is an unconfirmed send.
    pub fn is_pending(&self, message_id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_pending() && e.message().id == message_id)
    }

    /// Snapshot of every message, pending ones included.
    pub fn messages(&self) -> Vec<Message> {
        self.entries.iter().map(|e| e.message().clone()).collect()
    }

    /// Group the current snapshot.
    ///
    /// Recomputed on every call; nothing derived is kept between calls.
    pub fn grouped(&self) -> GroupedThread {
        let messages = self.entries.iter().map(ThreadEntry::message).collect();
        group_refs(messages, &self.options)
    }

    /// Current generation, bumped by every change to a confirmed message.
    ///
    /// Read it before starting a fetch and pass it to
    /// [`load_since`](Self::load_since) with the result.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace every confirmed message with `messages`.
    ///
    /// Pending sends are kept so they survive a refresh.
    pub fn load(&mut self, messages: Vec<Message>) {
        self.load_since(messages, self.generation);
    }

    /// Apply a snapshot fetched when the session was at `generation`.
    ///
    /// Confirmed messages received, removed or confirmed locally after that
    /// point win over the snapshot: they are kept (or stay removed) rather
    /// than rolled back. Everything else is replaced by `messages`. Pending
    /// sends are always kept.
    pub fn load_since(&mut self, messages: Vec<Message>, generation: u64) {
        let previous = std::mem::take(&mut self.entries);
        let changed = &self.changed;
        let is_newer = |id: &str| changed.get(id).is_some_and(|&g| g > generation);

        let mut entries: Vec<ThreadEntry> = messages
            .into_iter()
            .filter(|m| !is_newer(m.id.as_str()))
            .map(ThreadEntry::Confirmed)
            .collect();
        let fetched = entries.len();

        let (pending, confirmed): (Vec<_>, Vec<_>) =
            previous.into_iter().partition(ThreadEntry::is_pending);
        entries.extend(
            confirmed
                .into_iter()
                .filter(|e| is_newer(e.message().id.as_str())),
        );
        let kept = entries.len() - fetched;
        entries.extend(pending);
        self.entries = entries;

        tracing::debug!(
            thread = %self.thread_id,
            messages = self.entries.len(),
            kept,
            "loaded thread"
        );
    }

    /// Insert or replace a confirmed message, matched by id.
    pub fn receive(&mut self, message: Message) {
        let message_id = message.id.clone();
        let existing = self
            .entries
            .iter_mut()
            .find(|e| !e.is_pending() && e.message().id == message.id);

        match existing {
            Some(entry) => *entry = ThreadEntry::Confirmed(message),
            None => self.entries.push(ThreadEntry::Confirmed(message)),
        }
        self.touch(&message_id);
    }

    /// Remove a confirmed message by id.
    pub fn remove(&mut self, message_id: &str) -> Option<Message> {
        let index = self
            .entries
            .iter()
            .position(|e| !e.is_pending() && e.message().id == message_id)?;

        self.touch(message_id);
        match self.entries.remove(index) {
            ThreadEntry::Confirmed(message) => Some(message),
            ThreadEntry::Pending(_) => None,
        }
    }

    /// Start an optimistic send.
    ///
    /// The draft is shown immediately under a provisional id equal to the
    /// returned correlation id. Replying to a message that is itself still
    /// pending fails with [`Error::ParentPending`], since the backend has no
    /// id for it yet.
    pub fn begin_send(&mut self, draft: MessageDraft) -> Result<PendingSend> {
        if let Some(parent_id) = draft.reply_to.as_deref() {
            if self.is_pending(parent_id) {
                tracing::warn!(
                    thread = %self.thread_id,
                    parent = parent_id,
                    "reply to a message that is still pending"
                );
                return Err(Error::ParentPending(parent_id.to_string()));
            }
        }

        let correlation_id = CorrelationId::new(self.next_seq);
        self.next_seq += 1;

        let message = draft.to_message(correlation_id.to_string());
        self.entries.push(ThreadEntry::Pending(PendingMessage {
            correlation_id,
            message,
            draft: draft.clone(),
        }));

        tracing::debug!(thread = %self.thread_id, %correlation_id, "send started");

        Ok(PendingSend {
            correlation_id,
            draft,
        })
    }

    /// Replace a pending send with the message the backend accepted.
    ///
    /// A copy of the same message that already arrived out of band is
    /// dropped. If the message is a reply, its parent group is expanded.
    /// Expansion recorded under the provisional id moves to the server id.
    pub fn confirm_send(&mut self, correlation_id: CorrelationId, message: Message) -> Result<()> {
        self.pending_index(correlation_id)?;

        self.entries
            .retain(|e| e.is_pending() || e.message().id != message.id);
        let index = self.pending_index(correlation_id)?;

        if self.expansion.collapse(&correlation_id.to_string()) {
            self.expansion.expand(message.id.as_str());
        }
        if let Some(parent_id) = message.parent_id() {
            self.expansion.expand(parent_id);
        }
        self.touch(&message.id);

        tracing::debug!(
            thread = %self.thread_id,
            %correlation_id,
            message_id = %message.id,
            "send confirmed"
        );

        self.entries[index] = ThreadEntry::Confirmed(message);
        Ok(())
    }

    /// Roll back a pending send that the backend rejected.
    pub fn fail_send(&mut self, correlation_id: CorrelationId) -> Result<PendingMessage> {
        let index = self.pending_index(correlation_id)?;

        match self.entries.remove(index) {
            ThreadEntry::Pending(pending) => {
                tracing::debug!(thread = %self.thread_id, %correlation_id, "send rolled back");
                Ok(pending)
            }
            ThreadEntry::Confirmed(_) => Err(Error::UnknownCorrelation(correlation_id)),
        }
    }

    /// Show the replies of a comment.
    pub fn view_replies(&mut self, parent_id: &str) {
        self.expansion.expand(parent_id);
    }

    /// Hide the replies of a comment.
    pub fn hide_replies(&mut self, parent_id: &str) {
        self.expansion.collapse(parent_id);
    }

    /// Flip the replies of a comment between shown and hidden.
    pub fn toggle_replies(&mut self, parent_id: &str) -> ReplyVisibility {
        self.expansion.toggle(parent_id)
    }

    fn touch(&mut self, message_id: &str) {
        self.generation += 1;
        self.changed.insert(message_id.to_string(), self.generation);
    }

    fn pending_index(&self, correlation_id: CorrelationId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.correlation_id() == Some(correlation_id))
            .ok_or_else(|| {
                tracing::warn!(thread = %self.thread_id, %correlation_id, "no pending send");
                Error::UnknownCorrelation(correlation_id)
            })
    }
}
