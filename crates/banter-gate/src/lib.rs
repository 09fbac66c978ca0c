//! Permission gating for the banter dispatch engine.
//!
//! A command declares a [`Requirement`]; a [`PermissionGate`] decides whether
//! a caller satisfies it. Two gates are provided and a deployment picks one:
//!
//! - [`RoleLadder`]: resolves callers to a numeric [`Level`]
//!   (`Everyone < Trusted < Admin`) from the configured admin ids and
//!   trusted role name.
//! - [`GrantGate`]: resolves callers to a set of named permission grants
//!   held in a [`GrantStore`], with a `default` permission anyone satisfies
//!   and an `admin` grant that overrides everything.

use std::fmt;

use serde::{Deserialize, Serialize};

use banter_types::Caller;

pub mod grants;
pub mod ladder;

pub use grants::{
    FileGrantStore, GrantGate, GrantRecord, GrantStore, MemoryGrantStore, StoreError, ADMIN_GRANT,
    DEFAULT_GRANT,
};
pub use ladder::RoleLadder;

// ---------------------------------------------------------------------------
// Levels and requirements
// ---------------------------------------------------------------------------

/// Permission level ladder, ordered by privilege.
///
/// `Admin` > `Trusted` > `Everyone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// No special standing; the default for unknown callers.
    Everyone = 0,
    /// Holds the configured trusted role.
    Trusted = 1,
    /// Listed in the configured admin ids.
    Admin = 2,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Everyone => write!(f, "Everyone"),
            Level::Trusted => write!(f, "Trusted"),
            Level::Admin => write!(f, "Admin"),
        }
    }
}

/// What a command demands of its caller.
///
/// One capability with two shapes: a minimum rung on the level ladder, or a
/// named permission grant. Each gate documents how it treats the shape it
/// does not model natively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// The caller's resolved level must be at least this.
    MinimumLevel(Level),
    /// The caller must hold the named permission.
    Named(String),
}

impl Requirement {
    /// Open to every caller.
    pub fn anyone() -> Self {
        Requirement::MinimumLevel(Level::Everyone)
    }

    /// Requires the trusted level or above.
    pub fn trusted() -> Self {
        Requirement::MinimumLevel(Level::Trusted)
    }

    /// Requires the admin level.
    pub fn admin() -> Self {
        Requirement::MinimumLevel(Level::Admin)
    }

    /// Requires the named permission grant.
    pub fn named(permission: impl Into<String>) -> Self {
        Requirement::Named(permission.into())
    }
}

impl Default for Requirement {
    fn default() -> Self {
        Requirement::anyone()
    }
}

// ---------------------------------------------------------------------------
// Gate trait
// ---------------------------------------------------------------------------

/// Decides whether a caller satisfies a command's requirement.
///
/// The dispatcher consults the gate once per dispatch, before tokenizing
/// the rest of the line. Implementations must fail closed: when caller
/// standing cannot be resolved, deny.
pub trait PermissionGate: Send + Sync {
    fn permits(&self, caller: &Caller, requirement: &Requirement) -> bool;
}
