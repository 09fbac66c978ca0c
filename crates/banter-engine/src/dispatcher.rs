//! The dispatch pipeline: look up, gate, tokenize, bind, execute.
//!
//! [`Dispatcher`] is the engine's entry point. The transport hands it a
//! caller, one line of text with the prefix already stripped, and the
//! message's attachments; it hands back a [`Reply`]. Every pipeline
//! rejection is folded into the reply text, so the embedder never branches
//! on parse failures. Only handler failures surface as `Err`.
//!
//! # Security
//!
//! The permission check runs before any tokenization or binding, so an
//! unauthorised caller learns nothing about a command's argument shape,
//! and denials are logged with the caller id.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use banter_gate::PermissionGate;
use banter_types::{Attachment, Caller, Reply, DEFAULT_PREFIX};

use crate::command::{BoundArguments, BoundFiles, ChatCommand, CommandContext, CommandSpec};
use crate::error::DispatchError;
use crate::registry::Registry;
use crate::tokenizer::tokenize;
use crate::validate::Validator;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Binding policy knobs, fixed per dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindPolicy {
    /// Reject bare (non-`key=value`) tokens in the keyword section instead
    /// of binding them positionally to keyword arguments in declaration
    /// order.
    pub strict_keyword_syntax: bool,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// A fully resolved invocation, ready to execute.
pub struct Invocation {
    pub command: Arc<dyn ChatCommand>,
    pub arguments: BoundArguments,
    pub files: BoundFiles,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.command.spec().name())
            .field("arguments", &self.arguments)
            .field("files", &self.files)
            .finish()
    }
}

/// Routes command lines to registered handlers after permission checks and
/// argument binding.
pub struct Dispatcher {
    registry: Registry,
    gate: Arc<dyn PermissionGate>,
    prefix: String,
    policy: BindPolicy,
}

impl Dispatcher {
    /// Create a dispatcher with the default prefix and relaxed binding.
    pub fn new(registry: Registry, gate: Arc<dyn PermissionGate>) -> Self {
        Self {
            registry,
            gate,
            prefix: DEFAULT_PREFIX.to_string(),
            policy: BindPolicy::default(),
        }
    }

    /// Set the prefix usage lines render with.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the binding policy.
    pub fn with_policy(mut self, policy: BindPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying registry handle.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a line up to, but not including, handler execution.
    ///
    /// 1. Looks up the first space- or newline-delimited token in the
    ///    registry, skipping leading separators.
    /// 2. Checks the caller against the command's permission requirement.
    /// 3. Tokenizes the full line quote-aware and drops the trigger token.
    /// 4. Compares attachment count to declared file slots. File-count
    ///    errors are reported before any argument-count error.
    /// 5. Compares token count to declared arguments, too-many first.
    /// 6. Binds mandatory arguments positionally through their validators.
    /// 7. Binds the keyword section: `key=value` tokens by name, bare
    ///    tokens positionally under the relaxed policy.
    /// 8. Binds attachments to file slots by position and extension.
    pub fn resolve(
        &self,
        caller: &Caller,
        line: &str,
        attachments: &[Attachment],
    ) -> Result<Invocation, DispatchError> {
        // Split on the tokenizer's delimiters so the token looked up here
        // is the same token dropped before binding.
        let trigger = line
            .split([' ', '\n'])
            .find(|chunk| !chunk.is_empty())
            .unwrap_or_default();
        let command = match self.registry.resolve(trigger) {
            Some(command) => command,
            None => {
                return Err(DispatchError::UnknownCommand {
                    trigger: trigger.to_string(),
                })
            }
        };
        let spec = command.spec();

        if !self.gate.permits(caller, spec.requirement()) {
            warn!(caller = %caller.id, command = spec.name(), "dispatch denied");
            return Err(DispatchError::Unauthorized {
                trigger: trigger.to_string(),
            });
        }

        let mut tokens = tokenize(line);
        if !tokens.is_empty() {
            tokens.remove(0);
        }

        let slots = spec.file_arguments().len();
        if attachments.len() < slots {
            return Err(DispatchError::TooFewFiles {
                command: spec.name().to_string(),
                expected: slots,
                actual: attachments.len(),
            });
        }
        if attachments.len() > slots {
            return Err(DispatchError::TooManyFiles {
                command: spec.name().to_string(),
                expected: slots,
                actual: attachments.len(),
            });
        }

        if tokens.len() > spec.arguments().len() {
            return Err(DispatchError::TooManyArguments {
                command: spec.name().to_string(),
                max: spec.arguments().len(),
                actual: tokens.len(),
            });
        }
        if tokens.len() < spec.mandatory().len() {
            return Err(DispatchError::TooFewArguments {
                command: spec.name().to_string(),
                min: spec.mandatory().len(),
                actual: tokens.len(),
            });
        }

        let arguments = bind_arguments(spec, &tokens, self.policy)?;
        let files = bind_files(spec, attachments)?;

        debug!(
            command = spec.name(),
            args = arguments.len(),
            files = files.len(),
            "resolved"
        );

        Ok(Invocation {
            command: Arc::clone(&command),
            arguments,
            files,
        })
    }

    /// Dispatch a line end to end.
    ///
    /// Pipeline rejections become the reply text; the handler runs exactly
    /// once for a successful resolution, and only its own failures
    /// propagate as errors.
    pub async fn dispatch(
        &self,
        caller: &Caller,
        line: &str,
        attachments: &[Attachment],
    ) -> Result<Reply> {
        let invocation = match self.resolve(caller, line, attachments) {
            Ok(invocation) => invocation,
            Err(rejection) => {
                debug!(caller = %caller.id, %rejection, "dispatch rejected");
                return Ok(Reply::text(rejection.to_string()));
            }
        };

        let ctx = CommandContext {
            caller: caller.clone(),
            prefix: self.prefix.clone(),
            registry: self.registry.clone(),
            gate: Arc::clone(&self.gate),
        };

        let post_action = invocation.command.spec().post_action().cloned();
        let text = invocation
            .command
            .execute(&ctx, &invocation.arguments, &invocation.files)
            .await?;

        Ok(Reply { text, post_action })
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind the token sequence (trigger already removed) to the spec's
/// arguments. Counts are checked by the caller.
fn bind_arguments(
    spec: &CommandSpec,
    tokens: &[String],
    policy: BindPolicy,
) -> Result<BoundArguments, DispatchError> {
    let mandatory = spec.mandatory();
    let keyword = spec.keyword();
    let mut bound = BoundArguments::default();

    // The i-th token binds to the i-th mandatory declaration.
    for (argument, raw) in mandatory.iter().zip(tokens) {
        if !argument.validator().validate(raw) {
            return Err(invalid_value(raw, argument.name(), argument.validator()));
        }
        bound.insert(argument.name(), argument.fold_value(raw));
    }

    // Everything after the mandatory block is the keyword section.
    let extras = tokens.get(mandatory.len()..).unwrap_or_default();
    for (position, raw) in extras.iter().enumerate() {
        let (argument, value) = match raw.split_once('=') {
            None if policy.strict_keyword_syntax => {
                return Err(DispatchError::MangledInput { token: raw.clone() });
            }
            None => {
                // Relaxed: the i-th bare extra binds to the i-th declared
                // keyword argument. The count check bounds `position`.
                match keyword.get(position) {
                    Some(argument) => (argument, raw.as_str()),
                    None => return Err(DispatchError::MangledInput { token: raw.clone() }),
                }
            }
            Some((key, value)) => {
                if value.contains('=') {
                    return Err(DispatchError::MangledInput { token: raw.clone() });
                }
                match keyword.iter().find(|a| a.name() == key) {
                    Some(argument) => (argument, value),
                    None => {
                        return Err(DispatchError::UnknownArgument {
                            key: key.to_string(),
                        })
                    }
                }
            }
        };

        if !argument.validator().validate(value) {
            return Err(invalid_value(value, argument.name(), argument.validator()));
        }
        bound.insert(argument.name(), argument.fold_value(value));
    }

    Ok(bound)
}

/// Bind attachments to file slots by position. Counts already match.
fn bind_files(spec: &CommandSpec, attachments: &[Attachment]) -> Result<BoundFiles, DispatchError> {
    let mut bound = BoundFiles::default();

    for (slot, attachment) in spec.file_arguments().iter().zip(attachments) {
        if !slot.accepts(attachment.extension()) {
            return Err(DispatchError::InvalidFile {
                filename: attachment.filename.clone(),
                argument: slot.name().to_string(),
                file_type: slot.file_type().to_string(),
            });
        }
        bound.insert(slot.name(), attachment.clone());
    }

    Ok(bound)
}

fn invalid_value(value: &str, argument: &str, validator: &Validator) -> DispatchError {
    DispatchError::InvalidValue {
        value: value.to_string(),
        argument: argument.to_string(),
        requirements: validator.requirements().to_string(),
    }
}
