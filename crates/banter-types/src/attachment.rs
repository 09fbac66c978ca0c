//! File attachment handles delivered alongside a command line.
//!
//! The dispatcher only inspects filenames; fetching attachment content is
//! the transport's job, so an [`Attachment`] carries the name plus an
//! optional retrieval URL for the handler to use.

use serde::{Deserialize, Serialize};

/// A file attached to the message that carried the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Filename as reported by the platform (e.g., `"save.json"`).
    pub filename: String,
    /// Optional URL the handler can fetch the content from.
    #[serde(default)]
    pub url: Option<String>,
}

impl Attachment {
    /// Create an attachment handle with no retrieval URL.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: None,
        }
    }

    /// Create an attachment handle with a retrieval URL.
    pub fn with_url(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: Some(url.into()),
        }
    }

    /// The extension used for file-slot matching: the substring after the
    /// last `.`, compared case-sensitively by the binder. A filename with
    /// no dot yields the whole filename.
    pub fn extension(&self) -> &str {
        match self.filename.rfind('.') {
            Some(idx) => &self.filename[idx + 1..],
            None => &self.filename,
        }
    }
}
