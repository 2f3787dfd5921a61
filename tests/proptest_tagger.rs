//! Property-based tests for the tagger and folder.
//!
//! These verify the universal invariants across randomly generated inputs:
//! total coverage, monotone positions, determinism, and fold-level
//! clamping.

use proptest::prelude::*;
use std::rc::Rc;

use taglex::folder::{FOLD_BASE, FOLD_BLANK, FOLD_HEADER};
use taglex::{patterns, peg, Lexer, Options, PropertyHost};

/// A small C-like lexer used as the workhorse for the properties.
fn demo_lexer(lex_by_line: bool) -> Lexer {
    let mut lexer = Lexer::new("demo", Options::new().lex_by_line(lex_by_line));
    let keyword = lexer
        .tag(
            "keyword",
            patterns::word_match(["if", "else", "while", "return"], false),
        )
        .unwrap();
    lexer.add_rule("keyword", keyword);
    let comment = lexer.tag("comment", patterns::to_eol("//", false)).unwrap();
    lexer.add_rule("comment", comment);
    let string = lexer
        .tag(
            "string",
            patterns::delimited_range("\"", None, true, None, false),
        )
        .unwrap();
    lexer.add_rule("string", string);
    let number = lexer.tag("number", patterns::number()).unwrap();
    lexer.add_rule("number", number);
    let identifier = lexer.tag("identifier", patterns::word()).unwrap();
    lexer.add_rule("identifier", identifier);
    let operator = lexer.tag("operator", peg::set("{}()+-*/=<>;,")).unwrap();
    lexer.add_rule("operator", operator);
    lexer.add_fold_point("operator", "{", "}");
    lexer
}

/// Check the positional contract: one-based exclusive ends, strictly
/// increasing, and full coverage of the chunk.
fn assert_covering(text: &str, runs: &[(Rc<str>, usize)]) {
    if text.is_empty() {
        assert!(runs.is_empty(), "empty text must produce no runs");
        return;
    }
    let mut prev = 0;
    for (_, end) in runs {
        assert!(*end > prev, "end {} does not advance past {}", end, prev);
        assert!(*end <= text.len() + 1, "end {} exceeds chunk", end);
        prev = *end;
    }
    assert_eq!(prev, text.len() + 1, "runs must cover the whole chunk");
}

/// Strategy for text that resembles source code.
fn code_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z]{1,8}",
            "[0-9]{1,4}",
            Just("if".to_string()),
            Just("return".to_string()),
            Just("// note".to_string()),
            Just("\"str\"".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("\n".to_string()),
            Just(" ".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// Lexing never panics and always covers the chunk, on any input.
    #[test]
    fn total_coverage_arbitrary(text in ".{0,300}") {
        let mut lexer = demo_lexer(false);
        let runs = lexer.lex(&text, 0);
        assert_covering(&text, &runs);
    }

    /// The same holds for code-shaped input.
    #[test]
    fn total_coverage_code(text in code_strategy()) {
        let mut lexer = demo_lexer(false);
        let runs = lexer.lex(&text, 0);
        assert_covering(&text, &runs);
    }

    /// Line-mode lexing obeys the same positional contract.
    #[test]
    fn total_coverage_by_line(text in code_strategy()) {
        let mut lexer = demo_lexer(true);
        let runs = lexer.lex(&text, 0);
        assert_covering(&text, &runs);
    }

    /// Every produced tag is registered with a valid style number.
    #[test]
    fn tags_are_registered(text in code_strategy()) {
        let mut lexer = demo_lexer(false);
        for (tag, _) in lexer.lex(&text, 0) {
            let style = lexer.style_of(&tag);
            prop_assert!(style.is_some(), "unregistered tag {}", tag);
            prop_assert!(style.unwrap() <= 256);
        }
    }

    /// Re-lexing identical text with an identical init style is
    /// byte-identical.
    #[test]
    fn lexing_is_deterministic(text in ".{0,200}") {
        let mut lexer = demo_lexer(false);
        let first = lexer.lex(&text, 0);
        let second = lexer.lex(&text, 0);
        prop_assert_eq!(first, second);
    }

    /// An earlier rule always wins over a later one at the same position.
    #[test]
    fn rule_order_precedence(word in "[a-z]{1,6}") {
        let mut lexer = Lexer::new("t", Options::new());
        let kw = lexer.tag("keyword", patterns::word_match([word.as_str()], false)).unwrap();
        lexer.add_rule("keyword", kw);
        let id = lexer.tag("identifier", patterns::word()).unwrap();
        lexer.add_rule("identifier", id);
        let runs = lexer.lex(&word, 0);
        prop_assert_eq!(&*runs[0].0, "keyword");
    }

    /// Folding never produces a level below FOLD_BASE, and headers only
    /// appear on lines that increase the level or close a zero-sum block.
    #[test]
    fn fold_levels_clamped(text in code_strategy()) {
        let mut lexer = demo_lexer(false);
        let runs = lexer.lex(&text, 0);
        let mut host = PropertyHost::new();
        host.set_property("fold", "1");
        host.set_property("fold.scintillua.on.zero.sum.lines", "1");
        host.record_runs(&runs);
        let folds = lexer.fold(&text, 1, 1, FOLD_BASE, &host);
        for (_, level) in folds {
            let depth = level & !(FOLD_HEADER | FOLD_BLANK);
            prop_assert!(depth >= FOLD_BASE, "level {} below base", depth);
        }
    }

    /// Folding with identical inputs is deterministic.
    #[test]
    fn folding_is_deterministic(text in code_strategy()) {
        let mut lexer = demo_lexer(false);
        let runs = lexer.lex(&text, 0);
        let mut host = PropertyHost::new();
        host.set_property("fold", "1");
        host.record_runs(&runs);
        let first = lexer.fold(&text, 1, 1, FOLD_BASE, &host);
        let second = lexer.fold(&text, 1, 1, FOLD_BASE, &host);
        prop_assert_eq!(first, second);
    }

    /// Indentation folding also clamps and never panics.
    #[test]
    fn indent_fold_levels_clamped(text in "[ \ta-z\n]{0,200}") {
        let lexer = Lexer::new("t", Options::new().fold_by_indentation(true));
        let mut host = PropertyHost::new();
        host.set_property("fold", "1");
        let folds = lexer.fold(&text, 1, 1, FOLD_BASE, &host);
        for (_, level) in folds {
            let depth = level & !(FOLD_HEADER | FOLD_BLANK);
            prop_assert!(depth >= FOLD_BASE);
        }
    }
}

// Regression tests from proptest failures and edge cases.

#[test]
fn regression_empty_text() {
    let mut lexer = demo_lexer(false);
    assert!(lexer.lex("", 0).is_empty());
    let host = PropertyHost::new();
    assert!(lexer.fold("", 1, 1, FOLD_BASE, &host).is_empty());
}

#[test]
fn regression_lone_newline() {
    let mut lexer = demo_lexer(false);
    let runs = lexer.lex("\n", 0);
    assert_covering("\n", &runs);
}

#[test]
fn regression_unterminated_string() {
    let mut lexer = demo_lexer(false);
    let runs = lexer.lex("\"never closed", 0);
    assert_covering("\"never closed", &runs);
}

#[test]
fn regression_null_byte() {
    let mut lexer = demo_lexer(false);
    let text = "a\0b";
    let runs = lexer.lex(text, 0);
    assert_covering(text, &runs);
}

#[test]
fn regression_long_identifier() {
    let mut lexer = demo_lexer(false);
    let text = "a".repeat(10_000);
    let runs = lexer.lex(&text, 0);
    assert_covering(&text, &runs);
    assert_eq!(runs.len(), 1);
}

#[test]
fn regression_operator_soup() {
    let mut lexer = demo_lexer(false);
    let text = "{}{}{}((()))==<>;;".repeat(50);
    let runs = lexer.lex(&text, 0);
    assert_covering(&text, &runs);
}
