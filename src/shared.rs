//! Session shared between tasks.
//!
//! A [`SharedThreadSession`] lets several sends run concurrently against the
//! same thread. The lock is taken only to record a send and to reconcile its
//! outcome, never across the network call, and outcomes are matched by
//! correlation id so completion order does not matter.
//!
//! A refresh records the session generation before fetching, so sends
//! confirmed and messages received while the fetch is in flight survive the
//! older snapshot.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::message::{Message, MessageDraft};
use crate::session::ThreadSession;
use crate::source::MessageSource;
use crate::threading::{GroupedThread, ReplyVisibility};

/// Cheaply clonable handle to a [`ThreadSession`].
#[derive(Debug, Clone)]
pub struct SharedThreadSession {
    inner: Arc<Mutex<ThreadSession>>,
}

impl SharedThreadSession {
    /// Wrap a session.
    pub fn new(session: ThreadSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Group the current snapshot.
    pub async fn grouped(&self) -> GroupedThread {
        self.inner.lock().await.grouped()
    }

    /// Flip a comment's replies between shown and hidden.
    pub async fn toggle_replies(&self, parent_id: &str) -> ReplyVisibility {
        self.inner.lock().await.toggle_replies(parent_id)
    }

    /// Insert or replace a confirmed message, e.g. from a push notification.
    pub async fn receive(&self, message: Message) {
        self.inner.lock().await.receive(message);
    }

    /// Run a closure against the locked session.
    pub async fn with<R>(&self, f: impl FnOnce(&mut ThreadSession) -> R) -> R {
        let mut session = self.inner.lock().await;
        f(&mut *session)
    }

    /// Refetch the thread from `source`.
    ///
    /// Changes made through other handles during the fetch are kept.
    pub async fn refresh<S: MessageSource + ?Sized>(&self, source: &S) -> Result<()> {
        let (thread_id, generation) = {
            let session = self.inner.lock().await;
            (session.thread_id().to_string(), session.generation())
        };
        let messages = source.fetch_messages(&thread_id).await?;
        self.inner.lock().await.load_since(messages, generation);
        Ok(())
    }

    /// Send a draft through `source` with an optimistic pending entry.
    pub async fn send<S: MessageSource + ?Sized>(
        &self,
        source: &S,
        draft: MessageDraft,
    ) -> Result<Message> {
        let (thread_id, pending) = {
            let mut session = self.inner.lock().await;
            let pending = session.begin_send(draft)?;
            (session.thread_id().to_string(), pending)
        };

        let outcome = source.send_message(&thread_id, &pending.draft).await;

        let mut session = self.inner.lock().await;
        match outcome {
            Ok(message) => {
                session.confirm_send(pending.correlation_id, message.clone())?;
                Ok(message)
            }
            Err(err) => {
                tracing::warn!(
                    thread = %thread_id,
                    correlation_id = %pending.correlation_id,
                    error = %err,
                    "send failed"
                );
                session.fail_send(pending.correlation_id)?;
                Err(err)
            }
        }
    }
}

impl From<ThreadSession> for SharedThreadSession {
    fn from(session: ThreadSession) -> Self {
        Self::new(session)
    }
}
