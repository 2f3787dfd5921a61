//! Main tagger fuzz target.
//!
//! Tests arbitrary UTF-8 input against a realistic lexer to find panics
//! and violations of the coverage contract.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::rc::Rc;
use taglex::{patterns, peg, Lexer, Options};

fuzz_target!(|data: &str| {
    let mut lexer = build_lexer();
    let runs = lexer.lex(data, 0);
    verify_invariants(data, &runs);

    // Line mode must obey the same contract.
    let mut lexer = build_line_lexer();
    let runs = lexer.lex(data, 0);
    verify_invariants(data, &runs);
});

fn build_lexer() -> Lexer {
    let mut lexer = Lexer::new("fuzz", Options::new());
    let keyword = lexer
        .tag("keyword", patterns::word_match(["if", "else", "do", "end"], false))
        .unwrap();
    lexer.add_rule("keyword", keyword);
    let comment = lexer.tag("comment", patterns::to_eol("#", true)).unwrap();
    lexer.add_rule("comment", comment);
    let string = lexer
        .tag("string", patterns::delimited_range("\"", None, false, None, false))
        .unwrap();
    lexer.add_rule("string", string);
    let number = lexer.tag("number", patterns::number()).unwrap();
    lexer.add_rule("number", number);
    let identifier = lexer.tag("identifier", patterns::word()).unwrap();
    lexer.add_rule("identifier", identifier);
    let operator = lexer.tag("operator", peg::set("{}()<>=+-*/;,")).unwrap();
    lexer.add_rule("operator", operator);
    lexer
}

fn build_line_lexer() -> Lexer {
    let mut lexer = Lexer::new("fuzzline", Options::new().lex_by_line(true));
    let number = lexer.tag("number", patterns::number()).unwrap();
    lexer.add_rule("number", number);
    let identifier = lexer.tag("identifier", patterns::word()).unwrap();
    lexer.add_rule("identifier", identifier);
    lexer
}

/// Verify the positional contract that must hold for any input.
fn verify_invariants(source: &str, runs: &[(Rc<str>, usize)]) {
    if source.is_empty() {
        assert!(runs.is_empty(), "empty input produced runs");
        return;
    }

    // Invariant 1: end positions are one-based, within bounds, and
    // strictly increasing.
    let mut prev = 0;
    for (_, end) in runs {
        assert!(*end > prev, "end {} does not advance past {}", end, prev);
        assert!(
            *end <= source.len() + 1,
            "end {} exceeds chunk length {}",
            end,
            source.len()
        );
        prev = *end;
    }

    // Invariant 2: the final run covers the chunk.
    assert_eq!(
        prev,
        source.len() + 1,
        "runs stopped short of the chunk end"
    );

    // Invariant 3: no run carries an empty tag.
    for (tag, _) in runs {
        assert!(!tag.is_empty(), "empty tag name");
    }
}
