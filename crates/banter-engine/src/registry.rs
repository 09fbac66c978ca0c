//! Insertion-ordered command registry behind a cloneable handle.
//!
//! Commands are stored in registration order; listings and lookup both walk
//! that order. Cloning the registry clones a handle to the same underlying
//! list, which is what lets [`Validator::IsTrigger`](crate::Validator) and
//! the help built-ins observe commands registered after they were built.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::command::ChatCommand;

/// Shared, insertion-ordered collection of commands.
///
/// Trigger uniqueness is not enforced: lookup scans in registration order
/// and the first match wins, so a trigger colliding with an earlier
/// command's is silently shadowed. Registration normally completes before
/// traffic; the lock makes late registration safe anyway.
#[derive(Clone, Default)]
pub struct Registry {
    commands: Arc<RwLock<Vec<Arc<dyn ChatCommand>>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn register(&self, command: Box<dyn ChatCommand>) {
        let mut commands = self.commands.write().unwrap();
        commands.push(Arc::from(command));
    }

    /// The first registered command whose trigger or alias equals `token`,
    /// compared exactly.
    pub fn resolve(&self, token: &str) -> Option<Arc<dyn ChatCommand>> {
        let commands = self.commands.read().unwrap();
        commands
            .iter()
            .find(|command| command.spec().matches(token))
            .cloned()
    }

    /// Snapshot of all commands in registration order.
    pub fn commands(&self) -> Vec<Arc<dyn ChatCommand>> {
        let commands = self.commands.read().unwrap();
        commands.clone()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().unwrap().is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.len())
            .finish()
    }
}
