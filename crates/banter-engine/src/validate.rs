//! Pluggable argument validators.
//!
//! Each declared argument carries one [`Validator`]. The binder calls
//! `validate` on the raw token before case folding; on failure the
//! `requirements` text is embedded in the invalid-value reply, so it should
//! read as a sentence fragment explaining what would have been accepted.

use chrono::NaiveDate;

use crate::registry::Registry;

/// Validation rule for one argument.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Accepts anything.
    Any,
    /// Accepts anything; documents that the argument is free text.
    IsString,
    /// A number with no fractional remainder (`3` and `3.0`, not `3.5`).
    IsInteger,
    /// A finite real number.
    IsNumber,
    /// A finite real number greater than or equal to zero.
    IsPositive,
    /// A real calendar date in `YYYY-MM-DD` form.
    IsIso8601Date,
    /// The literal `true` or `false`, case-sensitive.
    IsBool,
    /// The trigger (or alias) of a registered command. Holds a live
    /// registry handle and re-queries it on every call, so commands
    /// registered after this validator was built are still accepted.
    IsTrigger(Registry),
}

impl Validator {
    /// Check a raw token before binding.
    pub fn validate(&self, raw: &str) -> bool {
        match self {
            Validator::Any | Validator::IsString => true,
            Validator::IsInteger => {
                matches!(raw.parse::<f64>(), Ok(n) if n.is_finite() && n.fract() == 0.0)
            }
            Validator::IsNumber => matches!(raw.parse::<f64>(), Ok(n) if n.is_finite()),
            Validator::IsPositive => {
                matches!(raw.parse::<f64>(), Ok(n) if n.is_finite() && n >= 0.0)
            }
            Validator::IsIso8601Date => is_iso8601_date(raw),
            Validator::IsBool => raw == "true" || raw == "false",
            Validator::IsTrigger(registry) => registry.resolve(raw).is_some(),
        }
    }

    /// Constraint text embedded in invalid-value replies.
    pub fn requirements(&self) -> &'static str {
        match self {
            Validator::Any => "Any value is accepted",
            Validator::IsString => "Must be a parsable string",
            Validator::IsInteger => "Must be a whole number",
            Validator::IsNumber => "Must be a number",
            Validator::IsPositive => "Must be a number greater than or equal to zero",
            Validator::IsIso8601Date => "Must be a date in YYYY-MM-DD form",
            Validator::IsBool => "Must be either true or false",
            Validator::IsTrigger(_) => "Must be in the command list",
        }
    }
}

/// `YYYY-MM-DD`: exact shape first, then calendar validity.
fn is_iso8601_date(raw: &str) -> bool {
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
