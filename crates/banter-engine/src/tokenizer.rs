//! Quote-aware command line tokenizer.
//!
//! Splits a line on unquoted spaces and newlines. A `"` toggles quoting and
//! is consumed, never emitted; there are no escape sequences. The first
//! token of a command line is the trigger; the dispatcher strips it before
//! argument binding.

/// Split a line into tokens.
///
/// Rules, applied per character:
/// 1. `"` flips the in-quotes flag (a toggle, not a stack) and is dropped.
/// 2. An unquoted space or newline closes the current token, if one is open.
/// 3. Anything else, tabs included, is appended to the current token.
///
/// End of input flushes an open token, so an unbalanced quote just runs to
/// the end of the line. Empty input yields no tokens, and a bare `""`
/// yields none either since the quotes never contribute characters.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' | '\n' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
