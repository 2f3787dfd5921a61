//! # taglex
//!
//! A lexer framework for syntax highlighting, built on Parsing Expression
//! Grammars.
//!
//! A host (a text editor or Scintilla-like component) hands the framework a
//! chunk of text and the style at its start; the framework hands back a
//! flat list of `(tag, end_position)` runs covering the chunk. The same
//! lexers drive per-line fold levels for code folding. Language definitions
//! are data against this framework: a set of named, ordered rules built
//! from PEG combinators, plus fold points and word lists.
//!
//! ## Features
//!
//! - **PEG kernel**: literals, sets, ranges, repetition, ordered choice,
//!   difference, lookahead, and capture/match-time-guard primitives
//! - **Pattern library**: identifiers, numbers, `to_eol`, delimited ranges,
//!   `starts_line`, `last_char_includes`, and a size-tuned `word_match`
//! - **Embedding**: one lexer inside another (CSS in HTML), including
//!   children that embed themselves into a parent (PHP in HTML), with
//!   lexing resumable inside the embedded language
//! - **Total coverage**: a one-character fallback guarantees every byte of
//!   every chunk is tagged, whatever the rules do
//! - **Folding**: symbol-based (with zero-sum-line promotion and fold
//!   predicates) and indentation-based strategies
//! - **Loader**: a registry resolving language names to definitions, with
//!   caching and proxy-lexer rewriting
//!
//! ## Quick start
//!
//! ```rust
//! use taglex::{patterns, Lexer, Options};
//!
//! let mut lexer = Lexer::new("demo", Options::new());
//! let keyword = lexer
//!     .tag("keyword", patterns::word_match(["if", "then"], false))
//!     .unwrap();
//! lexer.add_rule("keyword", keyword);
//! let identifier = lexer.tag("identifier", patterns::word()).unwrap();
//! lexer.add_rule("identifier", identifier);
//!
//! let runs = lexer.lex("if x", 0);
//! let names: Vec<&str> = runs.iter().map(|(tag, _)| &**tag).collect();
//! assert_eq!(names, ["keyword", "whitespace.demo", "identifier"]);
//! // End positions are one-based and exclusive; the last covers the chunk.
//! assert_eq!(runs.last().unwrap().1, 5);
//! ```
//!
//! ## Folding
//!
//! ```rust
//! use taglex::{folder, Lexer, Options, PropertyHost, OPERATOR};
//!
//! let mut lexer = Lexer::new("demo", Options::new());
//! let op = lexer.tag(OPERATOR, taglex::peg::set("{}")).unwrap();
//! lexer.add_rule("operator", op);
//! lexer.add_fold_point(OPERATOR, "{", "}");
//!
//! let text = "{\nx\n}";
//! let runs = lexer.lex(text, 0);
//! let mut host = PropertyHost::new();
//! host.set_property("fold", "1");
//! host.record_runs(&runs);
//!
//! let folds = lexer.fold(text, 1, 1, folder::FOLD_BASE, &host);
//! assert_ne!(folds[&1] & folder::FOLD_HEADER, 0);
//! ```
//!
//! ## Embedding
//!
//! ```rust
//! use taglex::{patterns, peg, Lexer, Options};
//!
//! let mut html = Lexer::new("html", Options::new());
//! let tag = html
//!     .tag("tag", patterns::delimited_range("<", Some(">"), true, Some(false), false))
//!     .unwrap();
//! html.add_rule("tag", tag);
//!
//! let mut css = Lexer::new("css", Options::new());
//! let prop = css.tag("identifier", patterns::word()).unwrap();
//! css.add_rule("identifier", prop);
//!
//! let start = html.tag("tag", peg::lit("<style>")).unwrap();
//! let end = peg::lit("</style>").peek();
//! html.embed(&mut css, start, end).unwrap();
//! // HTML tags outside <style>, CSS tags inside.
//! ```

pub mod error;
pub mod folder;
pub mod host;
pub mod lexer;
pub mod loader;
pub mod patterns;
pub mod peg;

mod grammar;
mod tagger;

pub use error::Error;
pub use folder::{
    fold_consecutive_lines, FoldArgs, FoldFn, FoldPoint, FOLD_BASE, FOLD_BLANK, FOLD_HEADER,
};
pub use host::{Host, PropertyHost};
pub use lexer::{
    Lexer, Options, ANNOTATION, ATTRIBUTE, CLASS, COMMENT, CONSTANT, CONSTANT_BUILTIN, DEFAULT,
    EMBEDDED, ERROR, FUNCTION, FUNCTION_BUILTIN, FUNCTION_METHOD, IDENTIFIER, KEYWORD, LABEL,
    NUMBER, OPERATOR, PREPROCESSOR, REGEX, STRING, TAG, TYPE, VARIABLE, VARIABLE_BUILTIN,
    WHITESPACE,
};
pub use loader::{Definition, Loader};
pub use peg::{Capture, Grammar, Pattern};
