//! Language registry: resolves names to lexer definitions.
//!
//! Definitions are registered constructor functions; the registry plays
//! the role of a search path, and the typed construction API is the only
//! surface a definition can touch. Loading caches on success only, so a
//! failed definition never leaves a partial lexer behind.

use crate::error::Error;
use crate::lexer::Lexer;
use std::collections::HashMap;

/// A language definition: builds a lexer for the given name.
///
/// The name passed in is the loader's `alt_name` when one was supplied,
/// which lets one definition serve under an embedding alias.
pub type Definition = Box<dyn Fn(&str) -> Result<Lexer, Error>>;

/// Resolves language names to compiled lexers.
#[derive(Default)]
pub struct Loader {
    definitions: HashMap<String, Definition>,
    cache: HashMap<String, Lexer>,
}

impl Loader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under `name`.
    pub fn register<F>(&mut self, name: &str, definition: F)
    where
        F: Fn(&str) -> Result<Lexer, Error> + 'static,
    {
        self.definitions
            .insert(name.to_string(), Box::new(definition));
    }

    /// Whether a definition is registered under `name`.
    pub fn has_language(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Load (or fetch the cached) lexer for `name`.
    pub fn load(&mut self, name: &str) -> Result<&mut Lexer, Error> {
        self.load_as(name, None)
    }

    /// Load `name`, constructing the definition with `alt_name` when given
    /// (the embedding alias of spec'd language files).
    pub fn load_as(&mut self, name: &str, alt_name: Option<&str>) -> Result<&mut Lexer, Error> {
        if !self.cache.contains_key(name) {
            let definition = self
                .definitions
                .get(name)
                .ok_or_else(|| Error::UnknownLanguage(name.to_string()))?;
            let lexer = definition(alt_name.unwrap_or(name))?;
            let lexer = rewrite_proxy(lexer);
            self.cache.insert(name.to_string(), lexer);
        }
        match self.cache.get_mut(name) {
            Some(lexer) => Ok(lexer),
            None => Err(Error::UnknownLanguage(name.to_string())),
        }
    }
}

/// A proxy definition re-points its identity: the inherited parent is the
/// effective lexer. The parent keeps its own name (its grammar
/// non-terminals depend on it) and remembers the proxy's name as
/// `parent_name`, which initial-rule selection maps back to the effective
/// grammar.
fn rewrite_proxy(mut lexer: Lexer) -> Lexer {
    if !lexer.proxy {
        return lexer;
    }
    match lexer.parent.take() {
        Some(parent) => {
            let mut effective = *parent;
            effective.parent_name = Some(lexer.name);
            effective.cache = None;
            effective
        }
        None => lexer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Options;
    use crate::patterns::word;

    fn trivial(name: &str) -> Result<Lexer, Error> {
        let mut lexer = Lexer::new(name, Options::new());
        let id = lexer.tag("identifier", word())?;
        lexer.add_rule("identifier", id);
        Ok(lexer)
    }

    #[test]
    fn test_unknown_language() {
        let mut loader = Loader::new();
        assert_eq!(
            loader.load("nope").err(),
            Some(Error::UnknownLanguage("nope".into()))
        );
    }

    #[test]
    fn test_load_caches() {
        let mut loader = Loader::new();
        loader.register("mini", trivial);
        assert!(loader.has_language("mini"));
        loader.load("mini").unwrap().add_rule("extra", word());
        // The cached lexer keeps load-time mutations.
        let again = loader.load("mini").unwrap();
        assert!(again.rule_ids().contains(&"extra"));
    }

    #[test]
    fn test_alt_name_reaches_definition() {
        let mut loader = Loader::new();
        loader.register("mini", trivial);
        let lexer = loader.load_as("mini", Some("alias")).unwrap();
        assert_eq!(lexer.name(), "alias");
    }

    #[test]
    fn test_definition_error_not_cached() {
        let mut loader = Loader::new();
        loader.register("broken", |name| {
            Err(Error::definition(name, "missing word list"))
        });
        assert!(loader.load("broken").is_err());
        // Still errors (nothing partial was cached), and a re-register
        // with a working definition takes effect.
        assert!(loader.load("broken").is_err());
        loader.register("broken", trivial);
        assert!(loader.load("broken").is_ok());
    }

    #[test]
    fn test_proxy_rewritten_to_parent() {
        let mut loader = Loader::new();
        loader.register("skin", |name| {
            let base = trivial("base")?;
            let mut proxy = Lexer::new(name, Options::new().inherit(base));
            proxy.add_rule("extra", word());
            Ok(proxy)
        });
        let lexer = loader.load("skin").unwrap();
        // The effective lexer is the parent, with the proxy's name
        // remembered for style resolution.
        assert_eq!(lexer.name(), "base");
        assert!(!lexer.is_proxy());
        assert_eq!(lexer.parent_name.as_deref(), Some("skin"));
        assert!(lexer.rule_ids().contains(&"extra"));
        assert!(lexer.style_of("whitespace.skin").is_some());
    }
}
