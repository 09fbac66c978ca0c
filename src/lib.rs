//! Text-command dispatch engine for chat-style applications.
//!
//! Applications describe commands declaratively (triggers, typed arguments,
//! file slots, permission requirements), register them, and hand incoming
//! lines of chat text to the [`Dispatcher`]. The dispatcher resolves the
//! trigger, checks permissions, tokenizes, validates and binds arguments,
//! runs the matched command, and returns a [`Reply`] ready to send back.
//! Every rejection along the way is already worded for the end user.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use banter::{register_builtins, Caller, Dispatcher, Registry, RoleLadder};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let registry = Registry::new();
//! register_builtins(&registry);
//!
//! let gate = Arc::new(RoleLadder::new(vec!["1001".into()]));
//! let dispatcher = Dispatcher::new(registry, gate);
//!
//! let caller = Caller::new("2002");
//! let reply = dispatcher.dispatch(&caller, "help", &[]).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub use banter_engine::{
    builtins, register_builtins, render_help, render_list, tokenize, usage_line, Argument,
    BindPolicy, BoundArguments, BoundFiles, ChatCommand, CommandContext, CommandSpec,
    DispatchError, Dispatcher, FileArgument, Invocation, Registry, Validator,
};
pub use banter_gate::{
    FileGrantStore, GrantGate, GrantStore, Level, MemoryGrantStore, PermissionGate, Requirement,
    RoleLadder,
};
pub use banter_types::{Attachment, BotConfig, Caller, ConfigError, PostAction, Reply};
