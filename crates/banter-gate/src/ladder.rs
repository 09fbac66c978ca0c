//! Role-ladder gate: caller identity to numeric permission level.
//!
//! The primary gate for deployments that rank callers on the
//! `Everyone < Trusted < Admin` ladder. Admins are listed by id in the bot
//! config; the trusted rung comes from holding a configured role name.

use subtle::ConstantTimeEq;

use banter_types::{BotConfig, Caller, DEFAULT_TRUSTED_ROLE};

use crate::{Level, PermissionGate, Requirement};

/// Gate that resolves callers against an admin-id list and a trusted role.
///
/// Unknown callers resolve to [`Level::Everyone`]; the gate never errors.
#[derive(Debug, Clone)]
pub struct RoleLadder {
    admins: Vec<String>,
    trusted_role: String,
}

impl RoleLadder {
    /// Create a ladder with the given admin ids and the default trusted role.
    pub fn new(admins: Vec<String>) -> Self {
        Self {
            admins,
            trusted_role: DEFAULT_TRUSTED_ROLE.to_string(),
        }
    }

    /// Override the role name that maps to [`Level::Trusted`].
    pub fn with_trusted_role(mut self, role: impl Into<String>) -> Self {
        self.trusted_role = role.into();
        self
    }

    /// Build a ladder from the loaded bot config.
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            admins: config.admins.clone(),
            trusted_role: config.trusted_role.clone(),
        }
    }

    /// Resolve a caller to their rung on the ladder.
    pub fn resolve(&self, caller: &Caller) -> Level {
        if self.is_admin_id(&caller.id) {
            Level::Admin
        } else if caller.has_role(&self.trusted_role) {
            Level::Trusted
        } else {
            Level::Everyone
        }
    }

    /// Whether a resolved level satisfies a requirement.
    ///
    /// `Named` requirements are not modeled on the ladder and resolve to
    /// admin-only.
    pub fn satisfies(requirement: &Requirement, level: Level) -> bool {
        match requirement {
            Requirement::MinimumLevel(min) => level >= *min,
            Requirement::Named(_) => level >= Level::Admin,
        }
    }

    /// Check an id against the admin list in constant time.
    ///
    /// Iterates every entry so timing does not reveal which (or how many)
    /// admin ids exist.
    fn is_admin_id(&self, id: &str) -> bool {
        let id_bytes = id.as_bytes();
        let mut found = false;

        for admin in &self.admins {
            let admin_bytes = admin.as_bytes();
            // ConstantTimeEq only compares same-length slices.
            if id_bytes.len() == admin_bytes.len() && id_bytes.ct_eq(admin_bytes).into() {
                found = true;
            }
        }

        found
    }
}

impl PermissionGate for RoleLadder {
    fn permits(&self, caller: &Caller, requirement: &Requirement) -> bool {
        Self::satisfies(requirement, self.resolve(caller))
    }
}
