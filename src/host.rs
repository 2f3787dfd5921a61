//! Host-provided views consulted during folding and configuration.
//!
//! The folder borrows these read-only for the duration of a `fold` call:
//! per-position styles from the previous lex pass, previously computed
//! fold levels (for typing-in-place stability), indentation amounts, and
//! the property map that gates folding behavior.

use std::collections::HashMap;
use std::rc::Rc;

/// Read-only views a host makes available to the framework.
pub trait Host {
    /// The tag at a one-based byte position, if styled.
    fn style_at(&self, pos: usize) -> Option<&str>;

    /// The previously computed encoded fold level for a one-based line,
    /// or 0 when unknown.
    fn fold_level(&self, line: usize) -> i32;

    /// The indentation column count of a one-based line.
    fn indent_amount(&self, line: usize) -> i32;

    /// Per-line integer state reserved for lexers that thread information
    /// across lines through match-time guards.
    fn line_state(&self, _line: usize) -> i32 {
        0
    }

    /// A configuration property, empty when unset.
    fn property(&self, key: &str) -> &str;

    /// A configuration property as an integer, 0 when unset or unparsable.
    fn property_int(&self, key: &str) -> i64 {
        self.property(key).trim().parse().unwrap_or(0)
    }
}

/// A map-backed [`Host`] for tests, the CLI, and embedding hosts without
/// storage of their own.
///
/// Style information is recorded as the run list a previous
/// [`crate::Lexer::lex`] call produced.
#[derive(Default)]
pub struct PropertyHost {
    properties: HashMap<String, String>,
    runs: Vec<(Rc<str>, usize)>,
    fold_levels: HashMap<usize, i32>,
    indents: HashMap<usize, i32>,
    line_states: HashMap<usize, i32>,
}

impl PropertyHost {
    /// Create an empty host with no properties set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration property.
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    /// Record the tag runs of a lex pass as the style map.
    pub fn record_runs(&mut self, runs: &[(Rc<str>, usize)]) {
        self.runs = runs.to_vec();
    }

    /// Store an encoded fold level for a line.
    pub fn set_fold_level(&mut self, line: usize, level: i32) {
        self.fold_levels.insert(line, level);
    }

    /// Store an indentation amount for a line.
    pub fn set_indent(&mut self, line: usize, columns: i32) {
        self.indents.insert(line, columns);
    }

    /// Store per-line state for a line.
    pub fn set_line_state(&mut self, line: usize, state: i32) {
        self.line_states.insert(line, state);
    }
}

impl Host for PropertyHost {
    fn style_at(&self, pos: usize) -> Option<&str> {
        if pos == 0 {
            return None;
        }
        let index = self.runs.partition_point(|(_, end)| *end <= pos);
        self.runs.get(index).map(|(tag, _)| &**tag)
    }

    fn fold_level(&self, line: usize) -> i32 {
        self.fold_levels.get(&line).copied().unwrap_or(0)
    }

    fn indent_amount(&self, line: usize) -> i32 {
        self.indents.get(&line).copied().unwrap_or(0)
    }

    fn line_state(&self, line: usize) -> i32 {
        self.line_states.get(&line).copied().unwrap_or(0)
    }

    fn property(&self, key: &str) -> &str {
        self.properties.get(key).map(String::as_str).unwrap_or("")
    }
}
