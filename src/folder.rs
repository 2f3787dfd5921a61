//! Fold-level computation.
//!
//! Two strategies: symbol-based folding driven by the lexer's fold-point
//! table and the host's per-position styles, and indentation-based folding
//! derived from leading whitespace. Levels are encoded as
//! `FOLD_BASE + depth` OR-combined with [`FOLD_HEADER`] and [`FOLD_BLANK`],
//! and never drop below [`FOLD_BASE`]. Inconsistent input yields wrong
//! folding, never a crash.

use crate::host::Host;
use crate::lexer::Lexer;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Base fold level; depth is encoded relative to this.
pub const FOLD_BASE: i32 = 0x400;
/// Flag for a blank line.
pub const FOLD_BLANK: i32 = 0x1000;
/// Flag for a line that opens a fold.
pub const FOLD_HEADER: i32 = 0x2000;

/// Context handed to a fold predicate.
pub struct FoldArgs<'a> {
    /// The host views, for property lookups.
    pub host: &'a dyn Host,
    /// The whole chunk being folded.
    pub text: &'a str,
    /// Byte offset of the current line within the chunk.
    pub line_pos: usize,
    /// The current line, without its terminator.
    pub line: &'a str,
    /// Byte column of the symbol within the line.
    pub col: usize,
    /// The matched fold symbol.
    pub symbol: &'a str,
}

/// A fold predicate: returns +1, −1, or 0 for a symbol occurrence.
pub type FoldFn = Rc<dyn Fn(&FoldArgs) -> i32>;

/// A fold-point value: a fixed delta or a context-dependent predicate.
#[derive(Clone)]
pub enum FoldPoint {
    /// A fixed level delta.
    Delta(i32),
    /// A predicate consulted at fold time.
    Dynamic(FoldFn),
}

/// Compute fold levels for each line of `text`.
pub(crate) fn fold(
    lexer: &Lexer,
    text: &str,
    start_pos: usize,
    start_line: usize,
    start_level: i32,
    host: &dyn Host,
) -> BTreeMap<usize, i32> {
    if text.is_empty() {
        return BTreeMap::new();
    }
    let root = lexer.grammar_root();
    let folding = host.property_int("fold") > 0;
    if folding && !root.fold_points.is_empty() {
        fold_by_symbols(root, text, start_pos, start_line, start_level, host)
    } else if folding
        && (root.fold_by_indentation || host.property_int("fold.scintillua.by.indentation") > 0)
    {
        fold_by_indentation(text, start_line, start_level, host)
    } else {
        let mut folds = BTreeMap::new();
        for (k, _) in chunk_lines(text).iter().enumerate() {
            folds.insert(start_line + k, start_level);
        }
        folds
    }
}

fn fold_by_symbols(
    root: &Lexer,
    text: &str,
    start_pos: usize,
    start_line: usize,
    start_level: i32,
    host: &dyn Host,
) -> BTreeMap<usize, i32> {
    let zero_sum = host.property_int("fold.scintillua.on.zero.sum.lines") > 0;
    let compact = host.property_int("fold.scintillua.compact") > 0;
    let case_insensitive = root.case_insensitive_fold_points;

    let mut folds = BTreeMap::new();
    let mut prev_level = start_level;
    let mut current_level = prev_level;
    let mut line_num = start_line;

    for (line_pos, line) in chunk_lines(text) {
        if line.is_empty() {
            folds.insert(line_num, prev_level | if compact { FOLD_BLANK } else { 0 });
            line_num += 1;
            continue;
        }

        let lowered;
        let hay: &str = if case_insensitive {
            lowered = line.to_ascii_lowercase();
            &lowered
        } else {
            line
        };

        // Scan symbols in registration order for occurrences, tracking
        // consumed ranges so symbols never overlap. Deltas are applied in
        // column order afterwards: a zero-sum line is one whose level dips
        // below the line's starting level before returning to it, which
        // only column order can observe.
        let mut ranges: Vec<(usize, usize)> = Vec::new();
        let mut hits: Vec<(usize, &str)> = Vec::new();
        for symbol in &root.fold_symbols {
            if symbol.is_empty() {
                continue;
            }
            let mut from = 0;
            while let Some(s) = find_bytes(hay.as_bytes(), symbol.as_bytes(), from) {
                let e = s + symbol.len();
                if !record_range(&mut ranges, s, e) {
                    break;
                }
                let word = symbol
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_');
                let before = s > 0 && is_word_byte(line.as_bytes()[s - 1]);
                let after = e < line.len() && is_word_byte(line.as_bytes()[e]);
                if !word || !(before || after) {
                    hits.push((s, symbol.as_str()));
                }
                from = s + 1;
            }
        }
        hits.sort_by_key(|&(col, _)| col);

        let mut level_decreased = false;
        for (col, symbol) in hits {
            let pos = start_pos + line_pos + col;
            let Some(tag) = host.style_at(pos) else { continue };
            let Some(point) = root.fold_points.get(tag).and_then(|m| m.get(symbol)) else {
                continue;
            };
            let delta = match point {
                FoldPoint::Delta(delta) => *delta,
                FoldPoint::Dynamic(predicate) => predicate(&FoldArgs {
                    host,
                    text,
                    line_pos,
                    line,
                    col,
                    symbol,
                }),
            };
            current_level += delta;
            if delta < 0 && current_level < prev_level {
                level_decreased = true;
            }
        }

        folds.insert(line_num, prev_level);
        if current_level > prev_level {
            folds.insert(line_num, prev_level | FOLD_HEADER);
        } else if level_decreased && current_level == prev_level && zero_sum {
            if line_num > start_line {
                folds.insert(line_num, (prev_level - 1).max(FOLD_BASE) | FOLD_HEADER);
            } else {
                // Typing on the zero-sum line itself: rebuild from the
                // host's stored level, falling back to start_level when the
                // host has not populated this line yet.
                let stored = host.fold_level(line_num);
                let base = if stored > 0 { stored } else { start_level };
                let level = ((base & !(FOLD_HEADER | FOLD_BLANK)) - 1).max(FOLD_BASE);
                folds.insert(line_num, level | FOLD_HEADER);
                current_level += 1;
            }
        }
        if current_level < FOLD_BASE {
            current_level = FOLD_BASE;
        }
        prev_level = current_level;
        line_num += 1;
    }
    folds
}

fn fold_by_indentation(
    text: &str,
    start_line: usize,
    start_level: i32,
    host: &dyn Host,
) -> BTreeMap<usize, i32> {
    let lines = chunk_lines(text);
    let indents: Vec<Option<i32>> = lines
        .iter()
        .map(|(_, line)| {
            if line.bytes().all(|b| matches!(b, b' ' | b'\t')) {
                None
            } else {
                Some(leading_indent(line))
            }
        })
        .collect();

    let mut folds = BTreeMap::new();
    let mut current_level = (start_level & !(FOLD_HEADER | FOLD_BLANK)).max(FOLD_BASE);

    // Reconcile with the nearest non-blank line before the chunk: if the
    // first incoming indent is deeper, that prior line becomes a header.
    let first_incoming = indents.iter().flatten().next().copied();
    let mut prior = None;
    for line in (1..start_line).rev() {
        if host.fold_level(line) & FOLD_BLANK == 0 {
            prior = Some(line);
            break;
        }
    }
    if let (Some(prior_line), Some(first)) = (prior, first_incoming) {
        let prior_indent = host.indent_amount(prior_line);
        if first > prior_indent {
            folds.insert(prior_line, (FOLD_BASE + prior_indent) | FOLD_HEADER);
        }
        current_level = FOLD_BASE + prior_indent;
    }

    for (k, indent) in indents.iter().enumerate() {
        let line_num = start_line + k;
        match indent {
            None => {
                folds.insert(line_num, current_level | FOLD_BLANK);
            }
            Some(indent) => {
                let level = FOLD_BASE + indent;
                let next = indents[k + 1..].iter().flatten().next();
                let header = next.map_or(false, |n| n > indent);
                folds.insert(line_num, if header { level | FOLD_HEADER } else { level });
                current_level = level;
            }
        }
    }
    folds
}

/// Build a fold predicate grouping consecutive lines whose first
/// non-whitespace content starts with `prefix`.
///
/// Returns +1 on the first line of a run, −1 on the last, 0 otherwise.
/// Gated by the `fold.scintillua.line.groups` property.
pub fn fold_consecutive_lines(prefix: &str) -> FoldFn {
    let prefix = prefix.to_string();
    Rc::new(move |args: &FoldArgs| {
        if args.host.property_int("fold.scintillua.line.groups") == 0 {
            return 0;
        }
        // Only the symbol leading the line counts.
        let lead = args.line.len() - args.line.trim_start().len();
        if args.col != lead {
            return 0;
        }
        let starts = |l: &str| l.trim_start().starts_with(prefix.as_str());
        let prev = previous_line(args.text, args.line_pos).map_or(false, starts);
        let next = next_line(args.text, args.line_pos + args.line.len()).map_or(false, starts);
        if !prev && next {
            1
        } else if prev && !next {
            -1
        } else {
            0
        }
    })
}

/// Lines of `text` with their byte offsets, terminators stripped.
fn chunk_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push((offset, content));
        offset += raw.len();
    }
    lines
}

/// Byte-wise substring search starting at `from`.
fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|found| from + found)
}

fn record_range(ranges: &mut Vec<(usize, usize)>, s: usize, e: usize) -> bool {
    for &(rs, re) in ranges.iter() {
        if s < re && rs < e {
            return false;
        }
    }
    ranges.push((s, e));
    true
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn leading_indent(line: &str) -> i32 {
    let mut cols = 0;
    for b in line.bytes() {
        match b {
            b' ' => cols += 1,
            b'\t' => cols = (cols / 4 + 1) * 4,
            _ => break,
        }
    }
    cols
}

fn previous_line(text: &str, line_pos: usize) -> Option<&str> {
    if line_pos == 0 {
        return None;
    }
    let before = &text[..line_pos];
    let before = before.strip_suffix('\n').unwrap_or(before);
    let before = before.strip_suffix('\r').unwrap_or(before);
    let start = before.rfind('\n').map_or(0, |i| i + 1);
    Some(&before[start..])
}

fn next_line(text: &str, line_end: usize) -> Option<&str> {
    let rest = &text[line_end..];
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;
    let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    Some(&rest[..end])
}
