//! Text-command dispatch: parsing, validation, and routing.
//!
//! Turns a line of chat text plus its attachments into a validated command
//! invocation and runs it. Commands describe themselves declaratively
//! through [`CommandSpec`]; the [`Dispatcher`] owns the fixed rejection
//! order (unknown trigger, permissions, file counts, argument counts,
//! binding) so individual commands never see malformed input.
//!
//! # Architecture
//!
//! - [`tokenizer`]: quote-aware splitting of the raw line
//! - [`validate`]: per-value validators and their requirement text
//! - [`argument`]: argument and file-slot descriptors
//! - [`command`]: the [`ChatCommand`] trait and its metadata
//! - [`registry`]: shared, append-only command lookup
//! - [`dispatcher`]: the resolve/dispatch pipeline
//! - [`builtins`]: the help and list commands
//! - [`error`]: rejection taxonomy, rendered as user-facing reply text

pub mod argument;
pub mod builtins;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod tokenizer;
pub mod validate;

pub use argument::{Argument, FileArgument};
pub use builtins::{register_builtins, render_help, render_list, usage_line};
pub use command::{BoundArguments, BoundFiles, ChatCommand, CommandContext, CommandSpec};
pub use dispatcher::{BindPolicy, Dispatcher, Invocation};
pub use error::DispatchError;
pub use registry::Registry;
pub use tokenizer::tokenize;
pub use validate::Validator;
