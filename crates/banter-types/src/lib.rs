//! Core types shared across all banter crates.
//!
//! Defines the boundary vocabulary between a chat transport and the command
//! dispatcher: caller identity, attachment handles, the reply surface, and
//! bot configuration.

pub mod attachment;
pub mod caller;
pub mod config;
pub mod reply;

pub use attachment::Attachment;
pub use caller::Caller;
pub use config::{mask_token, BotConfig, ConfigError, DEFAULT_PREFIX, DEFAULT_TRUSTED_ROLE};
pub use reply::{PostAction, Reply};
