//! Mock message source for testing purposes.
//!
//! This module provides an in-memory [`MessageSource`] that serves scripted
//! threads and accepts sends, so session flows can be tested without a
//! backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::message::{Message, MessageDraft};
use crate::source::MessageSource;

#[derive(Debug, Default)]
struct MockState {
    threads: HashMap<String, Vec<Message>>,
    sent: Vec<MessageDraft>,
    failures: VecDeque<String>,
    next_id: u64,
}

/// An in-memory message source that simulates a backend for testing.
///
/// Sent drafts are stored under a server id `msg-<n>` and appended to their
/// thread, so a later fetch returns them.
#[derive(Debug, Default)]
pub struct MockMessageSource {
    state: Mutex<MockState>,
}

impl MockMessageSource {
    /// Create a mock source with no threads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a thread with messages.
    pub fn with_thread(self, thread_id: impl Into<String>, messages: Vec<Message>) -> Self {
        self.lock().threads.insert(thread_id.into(), messages);
        self
    }

    /// Append a message to a thread, as if another user had posted it.
    pub fn push_message(&self, thread_id: &str, message: Message) {
        self.lock()
            .threads
            .entry(thread_id.to_string())
            .or_default()
            .push(message);
    }

    /// Make the next send fail with `reason`.
    ///
    /// Can be called several times to queue failures for consecutive sends.
    pub fn fail_next_send(&self, reason: impl Into<String>) {
        self.lock().failures.push_back(reason.into());
    }

    /// Drafts received so far, in order, including failed ones.
    pub fn sent(&self) -> Vec<MessageDraft> {
        self.lock().sent.clone()
    }

    /// Current messages of a thread.
    pub fn messages(&self, thread_id: &str) -> Option<Vec<Message>> {
        self.lock().threads.get(thread_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MessageSource for MockMessageSource {
    async fn fetch_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        self.messages(thread_id)
            .ok_or_else(|| Error::Source(format!("thread {thread_id} not found")))
    }

    async fn send_message(&self, thread_id: &str, draft: &MessageDraft) -> Result<Message> {
        let mut state = self.lock();
        state.sent.push(draft.clone());

        if let Some(reason) = state.failures.pop_front() {
            return Err(Error::Source(reason));
        }
        if !state.threads.contains_key(thread_id) {
            return Err(Error::Source(format!("thread {thread_id} not found")));
        }

        state.next_id += 1;
        let message = draft.to_message(format!("msg-{}", state.next_id));
        state
            .threads
            .entry(thread_id.to_string())
            .or_default()
            .push(message.clone());

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{AuthorRef, DraftBuilder};

    fn make_draft(content: &str) -> MessageDraft {
        DraftBuilder::new()
            .author(AuthorRef::new("u1", "Ada", "ada"))
            .content(content)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_mock_send_assigns_server_ids() {
        let source = MockMessageSource::new().with_thread("t", vec![]);

        let first = source.send_message("t", &make_draft("one")).await.unwrap();
        let second = source.send_message("t", &make_draft("two")).await.unwrap();

        assert_eq!(first.id, "msg-1");
        assert_eq!(second.id, "msg-2");
        assert_eq!(source.messages("t").map(|m| m.len()), Some(2));
    }

    #[tokio::test]
    async fn test_mock_queued_failures() {
        let source = MockMessageSource::new().with_thread("t", vec![]);
        source.fail_next_send("first");
        source.fail_next_send("second");

        assert_eq!(
            source.send_message("t", &make_draft("a")).await,
            Err(Error::Source("first".to_string()))
        );
        assert_eq!(
            source.send_message("t", &make_draft("b")).await,
            Err(Error::Source("second".to_string()))
        );
        assert!(source.send_message("t", &make_draft("c")).await.is_ok());
        assert_eq!(source.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_unknown_thread() {
        let source = MockMessageSource::new();
        assert!(source.fetch_messages("nope").await.is_err());
        assert!(source.send_message("nope", &make_draft("a")).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_unknown_thread_does_not_consume_id() {
        let source = MockMessageSource::new().with_thread("t", vec![]);

        assert_eq!(
            source.send_message("nope", &make_draft("lost")).await,
            Err(Error::Source("thread nope not found".to_string()))
        );
        let stored = source.send_message("t", &make_draft("kept")).await.unwrap();

        assert_eq!(stored.id, "msg-1");
        assert!(source.messages("nope").is_none());
    }
}
