//! Upstream message source and the flows built on it.
//!
//! [`MessageSource`] is the seam to whatever actually talks to the backend
//! (an HTTP client, a local cache, a mock). The library never performs I/O
//! itself; [`MessageSourceExt`] only sequences calls to the source with the
//! sans-io [`ThreadSession`] operations.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::{Message, MessageDraft};
use crate::session::ThreadSession;

/// Backend collaborator that supplies and accepts thread messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch every message of a thread, in any order.
    async fn fetch_messages(&self, thread_id: &str) -> Result<Vec<Message>>;

    /// Submit a draft and return the message the backend stored.
    async fn send_message(&self, thread_id: &str, draft: &MessageDraft) -> Result<Message>;
}

/// Extension trait adding session flows to every [`MessageSource`].
///
/// # Example
///
/// ```
/// use reply_threads::message::{AuthorRef, DraftBuilder};
/// use reply_threads::mock::MockMessageSource;
/// use reply_threads::source::MessageSourceExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MockMessageSource::new().with_thread("post-1", vec![]);
/// let mut session = source.open_session("post-1").await?;
///
/// let draft = DraftBuilder::new()
///     .author(AuthorRef::new("u1", "Ada", "ada"))
///     .content("Hello!")
///     .build()?;
/// let sent = source.send(&mut session, draft).await?;
///
/// assert_eq!(session.grouped().flat[0].id, sent.id);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MessageSourceExt: MessageSource {
    /// Fetch a thread and load it into a new session.
    async fn open_session(&self, thread_id: &str) -> Result<ThreadSession>;

    /// Refetch the session's thread and replace its confirmed messages.
    ///
    /// Pending sends and expansion state are kept.
    async fn refresh(&self, session: &mut ThreadSession) -> Result<()>;

    /// Send a draft with an optimistic pending entry.
    ///
    /// On success the pending entry is replaced by the stored message (and a
    /// reply's parent is expanded); on failure it is rolled back and the
    /// source error is returned.
    async fn send(&self, session: &mut ThreadSession, draft: MessageDraft) -> Result<Message>;
}

/// Blanket implementation of `MessageSourceExt` for every `MessageSource`.
#[async_trait]
impl<S: MessageSource + ?Sized> MessageSourceExt for S {
    async fn open_session(&self, thread_id: &str) -> Result<ThreadSession> {
        let mut session = ThreadSession::new(thread_id);
        self.refresh(&mut session).await?;
        Ok(session)
    }

    async fn refresh(&self, session: &mut ThreadSession) -> Result<()> {
        let messages = self.fetch_messages(session.thread_id()).await?;
        session.load(messages);
        Ok(())
    }

    async fn send(&self, session: &mut ThreadSession, draft: MessageDraft) -> Result<Message> {
        let pending = session.begin_send(draft)?;

        match self.send_message(session.thread_id(), &pending.draft).await {
            Ok(message) => {
                session.confirm_send(pending.correlation_id, message.clone())?;
                Ok(message)
            }
            Err(err) => {
                tracing::warn!(
                    thread = %session.thread_id(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::message::{AuthorRef, DraftBuilder};
    use crate::mock::MockMessageSource;
    use chrono::{TimeZone, Utc};

    fn make_message(id: &str, minute: u32, reply_to: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            author: AuthorRef::new("u1", "Ada", "ada"),
            content: format!("body of {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
            reply_to: reply_to.map(|s| s.to_string()),
        }
    }

    fn make_draft(reply_to: Option<&str>) -> MessageDraft {
        let mut builder = DraftBuilder::new()
            .author(AuthorRef::new("u2", "Bob", "bob"))
            .content("hello")
            .created_at(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
        if let Some(parent) = reply_to {
            builder = builder.in_reply_to_id(parent);
        }
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn test_open_session() {
        let source = MockMessageSource::new().with_thread(
            "post-1",
            vec![make_message("r1", 2, Some("c1")), make_message("c1", 1, None)],
        );

        let session = source.open_session("post-1").await.unwrap();
        assert_eq!(session.thread_id(), "post-1");
        assert_eq!(session.grouped().flat.len(), 2);
    }

    #[tokio::test]
    async fn test_open_session_unknown_thread() {
        let source = MockMessageSource::new();
        let err = source.open_session("missing").await.unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }

    #[tokio::test]
    async fn test_refresh_keeps_expansion() {
        let source = MockMessageSource::new().with_thread(
            "post-1",
            vec![make_message("c1", 1, None), make_message("r1", 2, Some("c1"))],
        );
        let mut session = source.open_session("post-1").await.unwrap();
        session.view_replies("c1");

        source.push_message("post-1", make_message("r2", 3, Some("c1")));
        source.refresh(&mut session).await.unwrap();

        assert!(session.expansion().is_expanded("c1"));
        assert_eq!(session.grouped().groups[0].reply_count(), 2);
    }

    #[tokio::test]
    async fn test_send_reply_confirms_and_expands() {
        let source =
            MockMessageSource::new().with_thread("post-1", vec![make_message("c1", 1, None)]);
        let mut session = source.open_session("post-1").await.unwrap();

        let sent = source.send(&mut session, make_draft(Some("c1"))).await.unwrap();

        assert_eq!(sent.parent_id(), Some("c1"));
        assert_eq!(session.pending_count(), 0);
        assert!(session.expansion().is_expanded("c1"));
        assert_eq!(session.grouped().groups[0].replies[0].id, sent.id);
        assert_eq!(source.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_rolls_back() {
        let source =
            MockMessageSource::new().with_thread("post-1", vec![make_message("c1", 1, None)]);
        let mut session = source.open_session("post-1").await.unwrap();
        source.fail_next_send("network unreachable");

        let err = source.send(&mut session, make_draft(Some("c1"))).await.unwrap_err();

        assert_eq!(err, Error::Source("network unreachable".to_string()));
        assert_eq!(session.pending_count(), 0);
        assert!(!session.expansion().is_expanded("c1"));
        assert_eq!(session.grouped().flat.len(), 1);
    }
}
