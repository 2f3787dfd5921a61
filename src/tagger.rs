//! Runs a compiled grammar over a chunk of text.
//!
//! Output is a flat run list: `(tag, end)` pairs with one-based exclusive
//! end positions, strictly increasing and covering the whole chunk. The
//! per-lexer fallback rule makes one byte of progress on anything no rule
//! matches, so failure is impossible for a non-empty grammar; a synthetic
//! trailing `default` run papers over anything that still stops short.

use crate::lexer::{Lexer, DEFAULT};
use crate::peg::Capture;
use std::rc::Rc;

/// Tag `text` with `lexer`, resuming per `init_style`.
pub(crate) fn lex(lexer: &mut Lexer, text: &str, init_style: usize) -> Vec<(Rc<str>, usize)> {
    if text.is_empty() {
        return Vec::new();
    }
    let default_tag = lexer.tag_rc(DEFAULT);
    if lexer.grammar_root().rules.is_empty() {
        return vec![(default_tag, text.len() + 1)];
    }

    lexer.ensure_compiled(init_style);
    let compiled = match &lexer.cache {
        Some(compiled) => compiled,
        None => return vec![(default_tag, text.len() + 1)],
    };
    let grammar = &compiled.grammar;

    let mut runs = Vec::new();
    if lexer.lex_by_line {
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let caps = grammar.captures(line);
            let before = runs.len();
            collect(&caps, offset, &mut runs);
            let line_end = offset + line.len() + 1;
            let covered = if runs.len() > before {
                runs.last().map(|(_, end)| *end).unwrap_or(offset + 1)
            } else {
                offset + 1
            };
            if covered < line_end {
                runs.push((default_tag.clone(), line_end));
            }
            offset += line.len();
        }
    } else {
        let caps = grammar.captures(text);
        collect(&caps, 0, &mut runs);
        let end = text.len() + 1;
        if runs.last().map_or(true, |(_, last)| *last < end) {
            runs.push((default_tag, end));
        }
    }
    runs
}

/// Flatten a capture list into `(tag, end)` runs, offsetting positions.
fn collect(caps: &[Capture], offset: usize, runs: &mut Vec<(Rc<str>, usize)>) {
    let mut pending: Option<Rc<str>> = None;
    for cap in caps {
        match cap {
            Capture::Value(value) => pending = Some(value.clone()),
            Capture::Pos(pos) => {
                if let Some(tag) = pending.take() {
                    runs.push((tag, pos + offset));
                }
            }
            Capture::List(inner) => collect(inner, offset, runs),
            Capture::Text(_) => {}
        }
    }
}
