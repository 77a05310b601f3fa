//! # reply-threads
//!
//! A sans-io library for turning the flat message list of a discussion thread
//! into collapsible comment/reply groups and the rows a list screen renders.
//!
//! ## Design Philosophy
//!
//! This library follows the "sans-io" design pattern:
//! - **Pure core**: Grouping and row building are total functions of a
//!   message snapshot and an expansion state
//! - **I/O Separation**: Fetching and sending go through the
//!   [`MessageSource`](source::MessageSource) trait, implemented by the caller
//! - **Recompute, never patch**: Every mutation is followed by regrouping the
//!   complete message list, so rows cannot drift from the source data
//!
//! ## Examples
//!
//! ### Grouping
//!
//! ```rust
//! use reply_threads::message::decode_messages;
//! use reply_threads::threading::{build_groups, ExpansionState};
//!
//! let payload = br#"[
//!     {"id": "c1", "author": {"id": "u1", "displayName": "Ada", "handle": "ada"},
//!      "content": "first", "createdAt": "2024-05-01T10:00:00Z"},
//!     {"id": "r1", "author": {"id": "u2", "displayName": "Bob", "handle": "bob"},
//!      "content": "reply", "createdAt": "2024-05-01T10:05:00Z", "replyTo": "c1"}
//! ]"#;
//!
//! let messages = decode_messages(payload).unwrap();
//! let grouped = build_groups(&messages);
//! let rows = grouped.list_items(&ExpansionState::new());
//! assert_eq!(rows.len(), 2); // comment + "view replies"
//! ```
//!
//! ### Optimistic sends
//!
//! ```rust
//! use reply_threads::message::{AuthorRef, DraftBuilder};
//! use reply_threads::session::ThreadSession;
//!
//! let mut session = ThreadSession::new("post-1");
//! let draft = DraftBuilder::new()
//!     .author(AuthorRef::new("u1", "Ada", "ada"))
//!     .content("Hello")
//!     .build()
//!     .unwrap();
//!
//! let send = session.begin_send(draft).unwrap();
//! // ... transmit send.draft, then report the outcome
//! session.fail_send(send.correlation_id).unwrap();
//! assert!(session.grouped().is_empty());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod message;
pub mod session;
pub mod source;
pub mod threading;

// Mock source for testing
pub mod mock;

pub use error::{Error, Result};
pub use message::{AuthorRef, DraftBuilder, Message, MessageDraft};
pub use session::{CorrelationId, ThreadSession};
pub use source::{MessageSource, MessageSourceExt};
pub use threading::{build_groups, build_list_items, ExpansionState, ListItem};

// Optional async runtime integration
#[cfg(feature = "tokio-runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-runtime")))]
pub mod shared;
