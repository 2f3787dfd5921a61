//! Folder fuzz target.
//!
//! Folds arbitrary text under arbitrary property combinations and checks
//! that levels are always clamped and line numbers contiguous.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use taglex::folder::{FOLD_BASE, FOLD_BLANK, FOLD_HEADER};
use taglex::{patterns, peg, Lexer, Options, PropertyHost};

#[derive(Arbitrary, Debug)]
struct FoldInput {
    text: String,
    zero_sum: bool,
    compact: bool,
    by_indentation: bool,
    start_level_offset: u8,
}

fuzz_target!(|input: FoldInput| {
    let mut lexer = Lexer::new("fuzz", Options::new().fold_by_indentation(input.by_indentation));
    let operator = lexer.tag("operator", peg::set("{}[]")).unwrap();
    lexer.add_rule("operator", operator);
    let word = lexer.tag("identifier", patterns::word()).unwrap();
    lexer.add_rule("identifier", word);
    if !input.by_indentation {
        lexer.add_fold_point("operator", "{", "}");
        lexer.add_fold_point("operator", "[", "]");
    }

    let runs = lexer.lex(&input.text, 0);

    let mut host = PropertyHost::new();
    host.set_property("fold", "1");
    if input.zero_sum {
        host.set_property("fold.scintillua.on.zero.sum.lines", "1");
    }
    if input.compact {
        host.set_property("fold.scintillua.compact", "1");
    }
    host.record_runs(&runs);

    let start_level = FOLD_BASE + i32::from(input.start_level_offset % 16);
    let folds = lexer.fold(&input.text, 1, 1, start_level, &host);

    let mut expected_line = 1;
    for (line, level) in &folds {
        assert_eq!(*line, expected_line, "fold lines must be contiguous");
        expected_line += 1;
        let depth = level & !(FOLD_HEADER | FOLD_BLANK);
        assert!(depth >= FOLD_BASE, "level {} below FOLD_BASE", depth);
    }
});
