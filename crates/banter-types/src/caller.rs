//! Caller identity as supplied by the embedding transport.

use serde::{Deserialize, Serialize};

/// Identity of the user who issued a command line.
///
/// The transport layer flattens whatever its native user object is into this
/// form before handing the line to the dispatcher: a stable id plus the role
/// names the user holds on the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    /// Stable unique identifier (e.g. a numeric chat-platform user id).
    pub id: String,
    /// Role names the user holds, verbatim as the platform reports them.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Caller {
    /// Create a caller with no roles.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    /// Add a role name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Whether the caller holds the named role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
