//! Built-in commands: help and list.
//!
//! Always available in any registry. They exercise the same descriptor
//! metadata as user commands, so neither needs special dispatcher support:
//! the rendering lives in free functions ([`usage_line`], [`render_help`],
//! [`render_list`]) that embedders can reuse for their own surfaces.

use anyhow::Result;
use async_trait::async_trait;

use crate::argument::Argument;
use crate::command::{BoundArguments, BoundFiles, ChatCommand, CommandContext, CommandSpec};
use crate::registry::Registry;
use crate::validate::Validator;

/// Register the help and list commands into the given registry.
pub fn register_builtins(registry: &Registry) {
    registry.register(Box::new(HelpCommand::new(registry)));
    registry.register(Box::new(ListCommand::new()));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a command's usage line: prefix, canonical trigger, mandatory
/// argument names, keyword arguments bracketed as optional.
pub fn usage_line(prefix: &str, spec: &CommandSpec) -> String {
    let mut usage = format!("{prefix}{}", spec.trigger());
    for argument in spec.arguments() {
        usage.push(' ');
        if argument.is_keyword() {
            usage.push_str(&format!("[{}=value]", argument.name()));
        } else {
            usage.push_str(argument.name());
        }
    }
    usage
}

/// Render the full help text for one command: the usage line, one line per
/// argument with its requirements, and the file slots if any.
pub fn render_help(prefix: &str, spec: &CommandSpec) -> String {
    let mut output = format!("Help for {}:\n`{}`", spec.name(), usage_line(prefix, spec));

    for argument in spec.arguments() {
        output.push_str(&format!(
            "\n{} - {}, {}",
            argument.name(),
            argument.description(),
            argument.validator().requirements()
        ));
    }

    if !spec.file_arguments().is_empty() {
        output.push_str("\n\nFile Arguments:");
        for file in spec.file_arguments() {
            output.push_str(&format!(
                "\n{} - {}, Must be of type {}",
                file.name(),
                file.description(),
                file.file_type()
            ));
        }
    }

    output
}

/// Render the commands the caller is permitted to use, in registration
/// order. Hidden commands are skipped.
pub fn render_list(ctx: &CommandContext) -> String {
    let mut output = String::from("Available commands:");

    for command in ctx.registry.commands() {
        let spec = command.spec();
        if spec.is_hidden() || !ctx.gate.permits(&ctx.caller, spec.requirement()) {
            continue;
        }
        output.push_str(&format!("\n`{}` - {}", spec.trigger(), spec.description()));
    }

    output.push_str("\n\nUse the help command for more information on any command");
    output
}

// ---------------------------------------------------------------------------
// HelpCommand
// ---------------------------------------------------------------------------

/// Shows detailed help for one command, or the full listing without a
/// target.
struct HelpCommand {
    spec: CommandSpec,
}

impl HelpCommand {
    fn new(registry: &Registry) -> Self {
        // The target stays case-sensitive so the stored value still matches
        // the trigger it validated against.
        let spec = CommandSpec::new("Help", "help", "Get help with any commands").argument(
            Argument::new(
                "command",
                "The command you wish to know more about",
                Validator::IsTrigger(registry.clone()),
            )
            .keyword()
            .case_sensitive(),
        );
        Self { spec }
    }
}

#[async_trait]
impl ChatCommand for HelpCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        ctx: &CommandContext,
        args: &BoundArguments,
        _files: &BoundFiles,
    ) -> Result<String> {
        let Some(target) = args.get("command") else {
            return Ok(render_list(ctx));
        };

        match ctx.registry.resolve(target) {
            Some(command) => Ok(render_help(&ctx.prefix, command.spec())),
            // The validator vouched for the target at bind time; a miss
            // here means the registry changed since.
            None => Ok(format!("Command \"{target}\" unknown!")),
        }
    }
}

// ---------------------------------------------------------------------------
// ListCommand
// ---------------------------------------------------------------------------

/// Lists every command available to the caller.
struct ListCommand {
    spec: CommandSpec,
}

impl ListCommand {
    fn new() -> Self {
        Self {
            spec: CommandSpec::new("List", "list", "List every command available to you"),
        }
    }
}

#[async_trait]
impl ChatCommand for ListCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn execute(
        &self,
        ctx: &CommandContext,
        _args: &BoundArguments,
        _files: &BoundFiles,
    ) -> Result<String> {
        Ok(render_list(ctx))
    }
}
