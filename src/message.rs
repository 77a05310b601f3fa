//! Message types and draft composition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reference to the user who wrote a message.
///
/// Opaque to grouping; carried through so render rows have what they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// User id
    pub id: String,
    /// Name shown next to the message
    pub display_name: String,
    /// Handle without the leading `@`
    pub handle: String,
}

impl AuthorRef {
    /// Create a new author reference.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            handle: handle.into(),
        }
    }
}

/// A single message in a thread, as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message id
    pub id: String,
    /// Author of the message
    pub author: AuthorRef,
    /// Text body
    pub content: String,
    /// Creation time, used only for ordering
    pub created_at: DateTime<Utc>,
    /// Id of the message this one replies to
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl Message {
    /// Id of the message this one replies to.
    ///
    /// An empty `reply_to` is treated the same as an absent one.
    pub fn parent_id(&self) -> Option<&str> {
        self.reply_to.as_deref().filter(|id| !id.is_empty())
    }

    /// Check if this message is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_id().is_some()
    }

    /// Check if this message is a top-level comment.
    pub fn is_top_level(&self) -> bool {
        !self.is_reply()
    }
}

/// Decode a JSON array of messages, as returned by the thread endpoint.
///
/// # Example
///
/// ```
/// use reply_threads::message::decode_messages;
///
/// let payload = br#"[{
///     "id": "c1",
///     "author": {"id": "u1", "displayName": "Ada", "handle": "ada"},
///     "content": "hello",
///     "createdAt": "2024-05-01T10:00:00Z",
///     "replyTo": null
/// }]"#;
///
/// let messages = decode_messages(payload).unwrap();
/// assert_eq!(messages[0].id, "c1");
/// assert!(messages[0].is_top_level());
/// ```
pub fn decode_messages(payload: &[u8]) -> Result<Vec<Message>> {
    Ok(serde_json::from_slice(payload)?)
}

/// A message composed locally and not yet accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    /// Author of the draft
    pub author: AuthorRef,
    /// Text body, never blank
    pub content: String,
    /// Parent comment id for replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Client-side creation time
    pub created_at: DateTime<Utc>,
}

impl MessageDraft {
    /// Build the provisional message shown while the draft is in flight.
    pub fn to_message(&self, id: impl Into<String>) -> Message {
        Message {
            id: id.into(),
            author: self.author.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            reply_to: self.reply_to.clone(),
        }
    }
}

/// Builder for composing new messages.
///
/// # Example
///
/// ```
/// use reply_threads::message::{AuthorRef, DraftBuilder};
///
/// let draft = DraftBuilder::new()
///     .author(AuthorRef::new("u1", "Ada", "ada"))
///     .content("Nice post!")
///     .in_reply_to_id("c1")
///     .build()
///     .unwrap();
///
/// assert_eq!(draft.reply_to.as_deref(), Some("c1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DraftBuilder {
    author: Option<AuthorRef>,
    content: Option<String>,
    reply_to: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl DraftBuilder {
    /// Create a new draft builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author (required).
    pub fn author(mut self, author: AuthorRef) -> Self {
        self.author = Some(author);
        self
    }

    /// Set the text body (required, must not be blank).
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Make this draft a reply to `message`.
    ///
    /// Threads are one level deep, so replying to a reply targets that
    /// reply's own parent comment.
    pub fn in_reply_to(mut self, message: &Message) -> Self {
        let target = message.parent_id().unwrap_or(&message.id);
        self.reply_to = Some(target.to_string());
        self
    }

    /// Make this draft a reply to the comment with the given id.
    pub fn in_reply_to_id(mut self, id: impl Into<String>) -> Self {
        self.reply_to = Some(id.into());
        self
    }

    /// Override the creation time. Defaults to the time of `build()`.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the draft.
    ///
    /// Returns an error if the author is missing or the content is blank.
    pub fn build(self) -> Result<MessageDraft> {
        let author = self
            .author
            .ok_or_else(|| Error::InvalidDraft("author is required".to_string()))?;

        let content = self
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidDraft("content must not be empty".to_string()))?;

        Ok(MessageDraft {
            author,
            content,
            reply_to: self.reply_to.filter(|id| !id.is_empty()),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_message(id: &str, reply_to: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            author: AuthorRef::new("u1", "Ada", "ada"),
            content: format!("body of {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            reply_to: reply_to.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_parent_id_treats_empty_as_top_level() {
        assert_eq!(make_message("c1", None).parent_id(), None);
        assert_eq!(make_message("c1", Some("")).parent_id(), None);
        assert!(make_message("c1", Some("")).is_top_level());
        assert_eq!(make_message("r1", Some("c1")).parent_id(), Some("c1"));
        assert!(make_message("r1", Some("c1")).is_reply());
    }

    #[test]
    fn test_decode_messages() {
        let payload = br#"[
            {"id": "c1", "author": {"id": "u1", "displayName": "Ada", "handle": "ada"},
             "content": "first", "createdAt": "2024-05-01T10:00:00Z"},
            {"id": "r1", "author": {"id": "u2", "displayName": "Bob", "handle": "bob"},
             "content": "reply", "createdAt": "2024-05-01T10:05:00Z", "replyTo": "c1"}
        ]"#;

        let messages = decode_messages(payload).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].reply_to, None);
        assert_eq!(messages[1].parent_id(), Some("c1"));
        assert_eq!(messages[1].author.display_name, "Bob");
        assert!(messages[0].created_at < messages[1].created_at);
    }

    #[test]
    fn test_decode_messages_malformed() {
        let err = decode_messages(b"{\"id\": 1}").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let value = serde_json::to_value(make_message("r1", Some("c1"))).unwrap();
        assert_eq!(value["replyTo"], "c1");
        assert_eq!(value["author"]["displayName"], "Ada");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_draft_builder_requires_author() {
        let err = DraftBuilder::new().content("hi").build().unwrap_err();
        assert_eq!(err, Error::InvalidDraft("author is required".to_string()));
    }

    #[test]
    fn test_draft_builder_rejects_blank_content() {
        let err = DraftBuilder::new()
            .author(AuthorRef::new("u1", "Ada", "ada"))
            .content("   \n")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDraft(_)));
    }

    #[test]
    fn test_draft_builder_trims_content() {
        let draft = DraftBuilder::new()
            .author(AuthorRef::new("u1", "Ada", "ada"))
            .content("  hello  ")
            .build()
            .unwrap();
        assert_eq!(draft.content, "hello");
        assert_eq!(draft.reply_to, None);
    }

    #[test]
    fn test_draft_in_reply_to_flattens_to_comment() {
        let comment = make_message("c1", None);
        let reply = make_message("r1", Some("c1"));

        let to_comment = DraftBuilder::new()
            .author(AuthorRef::new("u2", "Bob", "bob"))
            .content("a")
            .in_reply_to(&comment)
            .build()
            .unwrap();
        assert_eq!(to_comment.reply_to.as_deref(), Some("c1"));

        let to_reply = DraftBuilder::new()
            .author(AuthorRef::new("u2", "Bob", "bob"))
            .content("b")
            .in_reply_to(&reply)
            .build()
            .unwrap();
        assert_eq!(to_reply.reply_to.as_deref(), Some("c1"));
    }

    #[test]
    fn test_draft_to_message() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let draft = DraftBuilder::new()
            .author(AuthorRef::new("u1", "Ada", "ada"))
            .content("hello")
            .in_reply_to_id("c9")
            .created_at(at)
            .build()
            .unwrap();

        let message = draft.to_message("pending-1");
        assert_eq!(message.id, "pending-1");
        assert_eq!(message.created_at, at);
        assert_eq!(message.parent_id(), Some("c9"));
    }
}
