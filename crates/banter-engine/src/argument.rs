//! Argument descriptors: what a command declares, what the binder consumes.

use crate::validate::Validator;

/// One declared text argument.
///
/// Arguments are mandatory and positional by default; [`keyword`](Self::keyword)
/// turns the declaration into an optional `key=value` argument. Validation
/// always sees the raw token; the bound value is lower-cased before storage
/// unless [`case_sensitive`](Self::case_sensitive) is set.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    description: String,
    validator: Validator,
    keyword: bool,
    case_sensitive: bool,
}

impl Argument {
    /// Declare a mandatory positional argument.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        validator: Validator,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            validator,
            keyword: false,
            case_sensitive: false,
        }
    }

    /// Make this an optional `key=value` argument.
    pub fn keyword(mut self) -> Self {
        self.keyword = true;
        self
    }

    /// Store the bound value exactly as typed instead of lower-cased.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Apply the case-folding rule to a validated raw value.
    pub fn fold_value(&self, raw: &str) -> String {
        if self.case_sensitive {
            raw.to_string()
        } else {
            raw.to_lowercase()
        }
    }
}

/// One declared file slot, matched positionally against attachments.
#[derive(Debug, Clone)]
pub struct FileArgument {
    name: String,
    description: String,
    file_type: String,
}

impl FileArgument {
    /// Declare a file slot expecting the given extension, without the dot.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            file_type: file_type.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Whether an attachment extension matches this slot, case-sensitively.
    pub fn accepts(&self, extension: &str) -> bool {
        extension == self.file_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_mandatory_and_folding() {
        let arg = Argument::new("item", "The item to give", Validator::Any);
        assert!(!arg.is_keyword());
        assert!(!arg.is_case_sensitive());
        assert_eq!(arg.fold_value("Red Potion"), "red potion");
    }

    #[test]
    fn case_sensitive_preserves_value() {
        let arg = Argument::new("code", "Redeem code", Validator::Any).case_sensitive();
        assert_eq!(arg.fold_value("AbC123"), "AbC123");
    }

    #[test]
    fn file_slot_matches_extension_exactly() {
        let slot = FileArgument::new("save", "Save file to import", "json");
        assert!(slot.accepts("json"));
        assert!(!slot.accepts("JSON"));
        assert!(!slot.accepts("txt"));
    }
}
