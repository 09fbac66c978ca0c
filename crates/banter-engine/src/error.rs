//! Rejection taxonomy for the dispatch pipeline.
//!
//! Every way a line can fail before its handler runs is a variant here.
//! `Display` renders the exact text sent back to the caller, so the
//! dispatcher turns any rejection into a reply without further mapping.
//! Handler failures are deliberately absent: they stay `anyhow::Error` and
//! surface through `dispatch` as real errors.

/// A command line rejected before handler execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No registered command matched the first token.
    #[error("Command \"{trigger}\" unknown!")]
    UnknownCommand { trigger: String },

    /// The gate refused the caller.
    #[error("You are not authorised to use this command!")]
    Unauthorized { trigger: String },

    /// Fewer attachments than declared file slots.
    #[error("Not enough files supplied!\n{command} takes at least {expected}, but {actual} were supplied!")]
    TooFewFiles {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// More attachments than declared file slots.
    #[error("Too many files supplied!\n{command} takes up to {expected}, but {actual} were supplied!")]
    TooManyFiles {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// More tokens than declared arguments.
    #[error("Too many arguments supplied!\n{command} takes up to {max}, but {actual} were supplied!\nAre you trying to give a value with spaces in it? Wrap it in quotes to mark it as one argument.")]
    TooManyArguments {
        command: String,
        max: usize,
        actual: usize,
    },

    /// Fewer tokens than mandatory arguments.
    #[error("Not enough arguments supplied!\n{command} takes at least {min}, but {actual} were supplied!")]
    TooFewArguments {
        command: String,
        min: usize,
        actual: usize,
    },

    /// A value failed its argument's validator.
    #[error("{value} is not a valid value for {argument}! {requirements}!")]
    InvalidValue {
        value: String,
        argument: String,
        requirements: String,
    },

    /// A keyword token that could not be split into one key and one value.
    #[error("Mangled input '{token}'!")]
    MangledInput { token: String },

    /// A `key=value` token naming no declared keyword argument.
    #[error("Unknown argument: {key}")]
    UnknownArgument { key: String },

    /// An attachment whose extension does not match its file slot.
    #[error("{filename} is not a valid file for {argument}! Must be of filetype {file_type}!")]
    InvalidFile {
        filename: String,
        argument: String,
        file_type: String,
    },
}
