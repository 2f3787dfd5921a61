//! Error types for lexer construction and loading.
//!
//! Runtime pattern failures are not errors: a rejected match-time guard is
//! an ordinary local choice failure, and the tagger's fallback rule keeps
//! lexing total. Everything that *is* an error here surfaces synchronously
//! at the call site.

use std::fmt;

/// An error raised while building, loading, or mutating a lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No language definition is registered under the given name.
    UnknownLanguage(String),
    /// A language definition failed while constructing its lexer.
    Definition {
        /// The language being loaded.
        name: String,
        /// What went wrong.
        message: String,
    },
    /// `modify_rule` was called with an id that has no rule.
    RuleNotFound(String),
    /// Registering the tag would exceed the 256-style limit.
    StyleOverflow(String),
    /// The embedded child has no rules.
    EmbedRuleless(String),
    /// A word-list slot was addressed by a name or index that does not exist.
    WordListUnknown(String),
}

impl Error {
    /// Create a definition error for the named language.
    pub fn definition(name: &str, message: impl Into<String>) -> Self {
        Error::Definition {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownLanguage(name) => write!(f, "unknown language '{}'", name),
            Error::Definition { name, message } => {
                write!(f, "error loading language '{}': {}", name, message)
            }
            Error::RuleNotFound(id) => write!(f, "no rule with id '{}'", id),
            Error::StyleOverflow(tag) => {
                write!(f, "cannot register tag '{}': all 256 styles are in use", tag)
            }
            Error::EmbedRuleless(name) => {
                write!(f, "cannot embed lexer '{}': it has no rules", name)
            }
            Error::WordListUnknown(key) => write!(f, "no word list '{}'", key),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", Error::UnknownLanguage("lua".into())),
            "unknown language 'lua'"
        );
        assert_eq!(
            format!("{}", Error::RuleNotFound("string".into())),
            "no rule with id 'string'"
        );
        assert_eq!(
            format!("{}", Error::EmbedRuleless("css".into())),
            "cannot embed lexer 'css': it has no rules"
        );
    }

    #[test]
    fn test_definition_helper() {
        let err = Error::definition("html", "bad rule");
        let msg = format!("{}", err);
        assert!(msg.contains("html"));
        assert!(msg.contains("bad rule"));
    }
}
