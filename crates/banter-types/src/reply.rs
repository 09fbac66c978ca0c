//! Reply surface returned by the dispatcher.
//!
//! Every dispatch produces a [`Reply`]: the text the transport should send
//! back, plus an optional [`PostAction`] the embedding system interprets
//! after delivery (e.g., pin the message, react, trigger a follow-up job).
//! The dispatcher never executes post actions itself.

use serde::{Deserialize, Serialize};

/// A follow-up action the embedding system runs after sending the reply.
///
/// The `action` name is an opaque identifier agreed with the embedder;
/// `data` carries an optional structured payload for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostAction {
    /// Identifier the embedding system dispatches on.
    pub action: String,
    /// Optional payload for the action.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PostAction {
    /// Create a post action with no payload.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
        }
    }

    /// Create a post action carrying a payload.
    pub fn with_data(action: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            action: action.into(),
            data: Some(data),
        }
    }
}

/// The outcome of dispatching one command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Text to send back to the caller. Pipeline rejections arrive here as
    /// plain text; they are never surfaced as errors.
    pub text: String,
    /// Post action declared by the resolved command, if any. Rejected
    /// dispatches never carry one.
    pub post_action: Option<PostAction>,
}

impl Reply {
    /// Create a plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            post_action: None,
        }
    }

    /// Create a reply carrying a post action.
    pub fn with_post_action(text: impl Into<String>, post_action: PostAction) -> Self {
        Self {
            text: text.into(),
            post_action: Some(post_action),
        }
    }
}
