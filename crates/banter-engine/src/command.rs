//! Command metadata and the handler trait.
//!
//! Every command in the engine implements [`ChatCommand`]: a [`CommandSpec`]
//! describing its triggers, permission requirement, and declared arguments,
//! plus an async `execute` that runs once per successful dispatch. Commands
//! receive a [`CommandContext`] identifying the caller and carrying handles
//! to the registry and gate, and return the reply text.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use banter_gate::{PermissionGate, Requirement};
use banter_types::{Attachment, Caller, PostAction};

use crate::argument::{Argument, FileArgument};
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Spec
// ---------------------------------------------------------------------------

/// Declarative metadata for one command.
///
/// Built once, before registration. The argument list is split at
/// declaration time into the mandatory and keyword sub-sequences the binder
/// walks, each preserving declaration order; `arguments` keeps the combined
/// order for usage rendering. Every declared argument lives in exactly one
/// sub-sequence.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    triggers: Vec<String>,
    description: String,
    requirement: Requirement,
    hidden: bool,
    arguments: Vec<Argument>,
    mandatory: Vec<Argument>,
    keyword: Vec<Argument>,
    file_arguments: Vec<FileArgument>,
    post_action: Option<PostAction>,
}

impl CommandSpec {
    /// Start a spec with a display name, canonical trigger, and description.
    pub fn new(
        name: impl Into<String>,
        trigger: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            triggers: vec![trigger.into()],
            description: description.into(),
            requirement: Requirement::default(),
            hidden: false,
            arguments: Vec::new(),
            mandatory: Vec::new(),
            keyword: Vec::new(),
            file_arguments: Vec::new(),
            post_action: None,
        }
    }

    /// Add an alternative trigger.
    pub fn alias(mut self, trigger: impl Into<String>) -> Self {
        self.triggers.push(trigger.into());
        self
    }

    /// Set the permission requirement (default: open to anyone).
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    /// Hide the command from listings. It stays resolvable by trigger.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Declare an argument, routing it into the matching sub-sequence.
    pub fn argument(mut self, argument: Argument) -> Self {
        if argument.is_keyword() {
            self.keyword.push(argument.clone());
        } else {
            self.mandatory.push(argument.clone());
        }
        self.arguments.push(argument);
        self
    }

    /// Declare a file slot. Slots bind to attachments positionally.
    pub fn file_argument(mut self, file: FileArgument) -> Self {
        self.file_arguments.push(file);
        self
    }

    /// Attach a post action surfaced with every successful reply.
    pub fn with_post_action(mut self, action: PostAction) -> Self {
        self.post_action = Some(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical trigger, shown in usage lines and listings.
    pub fn trigger(&self) -> &str {
        &self.triggers[0]
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// All declared arguments in declaration order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Mandatory arguments in declaration order.
    pub fn mandatory(&self) -> &[Argument] {
        &self.mandatory
    }

    /// Keyword arguments in declaration order.
    pub fn keyword(&self) -> &[Argument] {
        &self.keyword
    }

    pub fn file_arguments(&self) -> &[FileArgument] {
        &self.file_arguments
    }

    pub fn post_action(&self) -> Option<&PostAction> {
        self.post_action.as_ref()
    }

    /// Whether a token equals any trigger, compared exactly.
    pub fn matches(&self, token: &str) -> bool {
        self.triggers.iter().any(|t| t == token)
    }
}

// ---------------------------------------------------------------------------
// Bound values
// ---------------------------------------------------------------------------

/// Immutable map of bound argument values, name to folded string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments(BTreeMap<String, String>);

impl BoundArguments {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bound pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Immutable map of bound attachments, slot name to attachment handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundFiles(BTreeMap<String, Attachment>);

impl BoundFiles {
    pub(crate) fn insert(&mut self, name: impl Into<String>, attachment: Attachment) {
        self.0.insert(name.into(), attachment);
    }

    pub fn get(&self, name: &str) -> Option<&Attachment> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attachment)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// Context and trait
// ---------------------------------------------------------------------------

/// Execution context passed to every command handler.
#[derive(Clone)]
pub struct CommandContext {
    /// Who issued the line.
    pub caller: Caller,
    /// Prefix usage lines render with.
    pub prefix: String,
    /// Live registry handle, for commands that enumerate or look up others.
    pub registry: Registry,
    /// The gate this dispatch went through, for permission-aware listings.
    pub gate: Arc<dyn PermissionGate>,
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("caller", &self.caller)
            .field("prefix", &self.prefix)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Trait every dispatchable command implements.
///
/// The spec is consulted throughout resolution; `execute` runs exactly once
/// per successful dispatch and returns the reply text. Handler failures are
/// not pipeline rejections: they propagate to the embedder as
/// `anyhow::Error`.
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// The command's declarative metadata.
    fn spec(&self) -> &CommandSpec;

    /// Run the command with bound arguments and files.
    async fn execute(
        &self,
        ctx: &CommandContext,
        args: &BoundArguments,
        files: &BoundFiles,
    ) -> Result<String>;
}
