//! Lowers a lexer and its embedded children into one runnable grammar.
//!
//! Non-terminal naming: each rule becomes `"<lexer>.<id>"`, the per-lexer
//! catch-all is `"<lexer>_fallback"`, the ordered choice over rules is
//! `"<lexer>_rule"`, and `"<lexer>"` is its repetition. Embedding adds
//! `"<parent>_to_<child>"` and `"<child>_to_<parent>"` transitions; word
//! lists become `"<lexer>_wordlist<i>"`.
//!
//! The compiled grammar is reconstructible from declarative lexer state
//! alone; the cache on the lexer is just this output plus the start symbol
//! it was built for.

use crate::lexer::{Lexer, DEFAULT};
use crate::patterns::word_match;
use crate::peg::{any, cap_const, cap_pos, never, var, Grammar, Pattern};

/// A compiled grammar together with the start symbol it was built for.
#[derive(Clone)]
pub(crate) struct Compiled {
    pub(crate) start: String,
    pub(crate) grammar: Grammar,
}

/// Compile `root` (and, recursively, its embedded children) into a grammar
/// whose start symbol is `start`.
pub(crate) fn compile(root: &Lexer, start: &str) -> Grammar {
    let mut grammar = Grammar::new(start);
    add_lexer(&mut grammar, root, None);
    grammar
}

fn add_lexer(grammar: &mut Grammar, lexer: &Lexer, parent: Option<(&Lexer, &Pattern)>) {
    let name = &lexer.name;

    let mut choice: Option<Pattern> = None;
    for (id, patt) in &lexer.rules {
        let nonterminal = format!("{}.{}", name, id);
        grammar.define(nonterminal.clone(), patt.clone());
        let reference = var(&nonterminal);
        choice = Some(match choice {
            Some(existing) => existing.or(reference),
            None => reference,
        });
    }

    // The single-character catch-all that guarantees progress.
    let fallback = format!("{}_fallback", name);
    grammar.define(&*fallback, cap_const(DEFAULT).seq(any(1)).seq(cap_pos()));
    let mut rule = match choice {
        Some(existing) => existing.or(var(&fallback)),
        None => var(&fallback),
    };

    // Transitions into embedded children are prepended in embedding order,
    // so the most recently embedded child is tried first.
    for child in &lexer.children {
        let to_child = format!("{}_to_{}", name, child.lexer.name);
        grammar.define(&*to_child, child.start.clone().seq(var(&child.lexer.name)));
        rule = var(&to_child).or(rule);
        add_lexer(grammar, &child.lexer, Some((lexer, &child.end)));
    }

    // An embedded lexer yields back to its parent where the end rule
    // matches; the difference keeps its own rules (and fallback) from
    // consuming the delimiter.
    if let Some((parent_lexer, end)) = parent {
        let to_parent = format!("{}_to_{}", name, parent_lexer.name);
        grammar.define(&*to_parent, end.clone());
        rule = rule
            .diff(var(&to_parent))
            .or(var(&to_parent).seq(var(&parent_lexer.name)));
    }

    grammar.define(format!("{}_rule", name), rule);
    grammar.define(name.clone(), var(&format!("{}_rule", name)).at_least(0));

    for (i, slot) in lexer.word_lists.iter().enumerate() {
        // An embedding parent's namespaced copy wins, so word lists set on
        // the parent after embedding reach the child's references.
        let mut words = &slot.words;
        let mut case_insensitive = slot.case_insensitive;
        if let Some((parent_lexer, _)) = parent {
            let key = format!("{}.{}", name, slot.name);
            if let Some(copy) = parent_lexer.word_lists.iter().find(|w| w.name == key) {
                words = &copy.words;
                case_insensitive = copy.case_insensitive;
            }
        }
        let nonterminal = format!("{}_wordlist{}", name, i + 1);
        let patt = if words.is_empty() {
            never()
        } else {
            word_match(words.iter().map(|w| w.as_str()), case_insensitive)
        };
        grammar.define(nonterminal, patt);
    }
}
