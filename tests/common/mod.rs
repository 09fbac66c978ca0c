//! Shared helpers for integration tests.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use banter::{
    Argument, Attachment, BoundArguments, BoundFiles, Caller, ChatCommand, CommandContext,
    CommandSpec, FileArgument, PermissionGate, Requirement, Validator,
};

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

/// Gate that lets every caller through.
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn permits(&self, _caller: &Caller, _requirement: &Requirement) -> bool {
        true
    }
}

/// Gate that refuses every caller.
pub struct DenyAll;

impl PermissionGate for DenyAll {
    fn permits(&self, _caller: &Caller, _requirement: &Requirement) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Command with one mandatory argument and two keyword arguments. Echoes
/// whatever was bound and counts invocations.
pub struct GiveCommand {
    spec: CommandSpec,
    calls: Arc<AtomicUsize>,
}

impl GiveCommand {
    /// Build the command plus a handle on its invocation counter.
    pub fn with_counter() -> (Box<dyn ChatCommand>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let command = Self {
            spec: give_spec(),
            calls: Arc::clone(&calls),
        };
        (Box::new(command), calls)
    }

    pub fn boxed() -> Box<dyn ChatCommand> {
        Self::with_counter().0
    }
}

#[async_trait]
impl ChatCommand for GiveCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        _ctx: &CommandContext,
        args: &BoundArguments,
        _files: &BoundFiles,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "item={} amount={} color={}",
            args.get("item").unwrap_or("-"),
            args.get("amount").unwrap_or("-"),
            args.get("color").unwrap_or("-"),
        ))
    }
}

/// The descriptor used by [`GiveCommand`].
pub fn give_spec() -> CommandSpec {
    CommandSpec::new("Give", "give", "Hands an item to a player")
        .argument(Argument::new(
            "item",
            "The item to hand over",
            Validator::IsString,
        ))
        .argument(Argument::new("amount", "How many to hand over", Validator::IsPositive).keyword())
        .argument(Argument::new("color", "Color variant", Validator::IsString).keyword())
}

/// Command with a mandatory integer argument and one json file slot.
pub struct ImportCommand {
    spec: CommandSpec,
}

impl ImportCommand {
    pub fn boxed() -> Box<dyn ChatCommand> {
        Box::new(Self {
            spec: CommandSpec::new("Import", "import", "Loads a saved game")
                .argument(Argument::new(
                    "slot",
                    "The slot to load into",
                    Validator::IsInteger,
                ))
                .file_argument(FileArgument::new("save", "The save to load", "json")),
        })
    }
}

#[async_trait]
impl ChatCommand for ImportCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        _ctx: &CommandContext,
        args: &BoundArguments,
        files: &BoundFiles,
    ) -> Result<String> {
        let save = files.get("save").expect("save slot should be bound");
        Ok(format!(
            "loaded {} into slot {}",
            save.filename,
            args.get("slot").unwrap_or("-"),
        ))
    }
}

/// Command whose handler always fails.
pub struct BrokenCommand {
    spec: CommandSpec,
}

impl BrokenCommand {
    pub fn boxed() -> Box<dyn ChatCommand> {
        Box::new(Self {
            spec: CommandSpec::new("Broken", "broken", "Always fails"),
        })
    }
}

#[async_trait]
impl ChatCommand for BrokenCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        _ctx: &CommandContext,
        _args: &BoundArguments,
        _files: &BoundFiles,
    ) -> Result<String> {
        bail!("exploded")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn attachment(filename: &str) -> Attachment {
    Attachment::new(filename)
}
