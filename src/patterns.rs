//! Reusable patterns built on the PEG kernel.
//!
//! Character classes are ASCII and matching is byte-wise throughout. These
//! are the building blocks language definitions reach for first; anything a
//! definition needs beyond them comes straight from [`crate::peg`].

use crate::peg::{any, guard, lit, never, range, recurse, recursive, set, Pattern};
use std::collections::HashSet;

/// Any single byte.
pub fn any_char() -> Pattern {
    any(1)
}

/// An ASCII letter.
pub fn alpha() -> Pattern {
    range(b'A', b'Z').or(range(b'a', b'z'))
}

/// An ASCII decimal digit.
pub fn digit() -> Pattern {
    range(b'0', b'9')
}

/// An ASCII letter or digit.
pub fn alnum() -> Pattern {
    alpha().or(digit())
}

/// An ASCII lowercase letter.
pub fn lower() -> Pattern {
    range(b'a', b'z')
}

/// An ASCII uppercase letter.
pub fn upper() -> Pattern {
    range(b'A', b'Z')
}

/// An ASCII hexadecimal digit.
pub fn xdigit() -> Pattern {
    digit().or(range(b'A', b'F')).or(range(b'a', b'f'))
}

/// A printable ASCII character, excluding space.
pub fn graph() -> Pattern {
    range(b'!', b'~')
}

/// A printable ASCII character that is not alphanumeric or space.
pub fn punct() -> Pattern {
    graph().diff(alnum())
}

/// ASCII whitespace: tab, vertical tab, form feed, newline, carriage
/// return, space.
pub fn space() -> Pattern {
    set("\t\n\x0b\x0c\r ")
}

/// A line ending: an optional carriage return followed by a line feed.
pub fn newline() -> Pattern {
    lit("\r").opt().seq("\n")
}

/// Any single byte that is not part of a line ending.
pub fn nonnewline() -> Pattern {
    any(1).diff(set("\r\n"))
}

/// One or more decimal digits.
pub fn dec_num() -> Pattern {
    digit().at_least(1)
}

/// A hexadecimal number: `0x` or `0X` followed by hex digits.
pub fn hex_num() -> Pattern {
    lit("0").seq(set("xX")).seq(xdigit().at_least(1))
}

/// An octal number: `0` followed by octal digits.
pub fn oct_num() -> Pattern {
    lit("0").seq(range(b'0', b'7').at_least(1))
}

/// An optionally signed integer in hexadecimal, octal, or decimal.
///
/// Hexadecimal is tried first so `0x` prefixes are not split, and octal
/// before decimal so `0` prefixes bind to the longer octal form.
pub fn integer() -> Pattern {
    set("+-").opt().seq(hex_num().or(oct_num()).or(dec_num()))
}

/// An optionally signed float with a decimal point and/or exponent.
///
/// At least one digit is required; a lone `.` never matches, and `1..2`
/// lexes as two integers rather than a float.
pub fn float() -> Pattern {
    let exponent = set("eE").seq(set("+-").opt()).seq(dec_num());
    let with_point = dec_num()
        .opt()
        .seq(".")
        .seq(dec_num())
        .or(dec_num().seq(".").seq(dec_num().opt()).seq(lit(".").not()));
    set("+-")
        .opt()
        .seq(with_point.seq(exponent.opt()).or(dec_num().seq(exponent)))
}

/// A float or an integer, preferring the float interpretation.
pub fn number() -> Pattern {
    float().or(integer())
}

/// A letter or underscore followed by alphanumerics or underscores.
pub fn word() -> Pattern {
    alpha()
        .or("_")
        .seq(alnum().or("_").at_least(0))
}

/// `prefix` followed by the rest of the line.
///
/// With `escape`, a backslash escapes the next byte, so a backslash before
/// the line ending continues the match onto the following line.
pub fn to_eol(prefix: impl Into<Pattern>, escape: bool) -> Pattern {
    let rest = if escape {
        lit("\\").seq(any(1)).or(nonnewline())
    } else {
        nonnewline()
    };
    prefix.into().seq(rest.at_least(0))
}

/// A region delimited by `s` and `e`, including the delimiters.
///
/// `e` defaults to `s`. The closing delimiter is optional, so an
/// unterminated region still matches to the end of input. When `escapes` is
/// `None` it defaults to true exactly when the delimiters are the same
/// single character (the string-literal case). With `balanced` and distinct
/// delimiters, nested `s…e` pairs are consumed.
pub fn delimited_range(
    s: &str,
    e: Option<&str>,
    single_line: bool,
    escapes: Option<bool>,
    balanced: bool,
) -> Pattern {
    let e = e.unwrap_or(s);
    let mut body = any(1).diff(lit(e));
    if single_line {
        body = body.diff(lit("\n"));
    }
    let escapes = escapes.unwrap_or(s.len() == 1 && s == e);
    if escapes {
        body = body.diff(lit("\\")).or(lit("\\").seq(any(1)));
    }
    if balanced && s != e {
        recursive(
            lit(s)
                .seq(body.diff(lit(s)).or(recurse()).at_least(0))
                .seq(lit(e).opt()),
        )
    } else {
        lit(s).seq(body.at_least(0)).seq(lit(e).opt())
    }
}

/// Restrict `patt` to match only at the start of a line.
///
/// With `allow_indent`, leading tabs and spaces are permitted between the
/// line start and the match.
pub fn starts_line(patt: Pattern, allow_indent: bool) -> Pattern {
    guard(patt, move |text, start, end| {
        let bytes = text.as_bytes();
        let mut pos = start;
        if allow_indent {
            while pos > 0 && matches!(bytes[pos - 1], b' ' | b'\t') {
                pos -= 1;
            }
        }
        if pos == 0 || matches!(bytes[pos - 1], b'\n' | b'\r') {
            Some(end)
        } else {
            None
        }
    })
}

/// A zero-width predicate on the last non-whitespace byte before the
/// current position. Succeeds at the start of input.
pub fn last_char_includes(chars: &str) -> Pattern {
    let chars = chars.to_string();
    guard(crate::peg::always(), move |text, start, _| {
        if start == 0 {
            return Some(0);
        }
        let bytes = text.as_bytes();
        let mut i = start;
        while i > 0 && matches!(bytes[i - 1], b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c) {
            i -= 1;
        }
        if i > 0 && chars.as_bytes().contains(&bytes[i - 1]) {
            Some(start)
        } else {
            None
        }
    })
}

/// A whole-word membership test against a word list.
///
/// Each item may itself be a whitespace-separated list of words. The
/// trailing-character class is alphanumerics plus `_` plus every other
/// non-whitespace byte that appears in any word, so hyphenated and dotted
/// keywords match as single words. Small case-sensitive lists compile to an
/// ordered choice with a negative lookahead; larger or case-insensitive
/// lists consume a run of word characters and test set membership in a
/// match-time guard.
pub fn word_match<I>(words: I, case_insensitive: bool) -> Pattern
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut list: Vec<String> = Vec::new();
    for item in words {
        for w in item.as_ref().split_whitespace() {
            list.push(w.to_string());
        }
    }
    if list.is_empty() {
        return never();
    }

    let mut class = String::with_capacity(64);
    for c in ('0'..='9').chain('A'..='Z').chain('a'..='z') {
        class.push(c);
    }
    class.push('_');
    for w in &list {
        for c in w.chars() {
            if !c.is_ascii_alphanumeric() && !c.is_whitespace() && c != '_' && !class.contains(c) {
                class.push(c);
            }
        }
    }
    let word_chars = set(&class);

    if list.len() <= 6 && !case_insensitive {
        // Longest first, so a word is never shadowed by one of its prefixes.
        list.sort_by(|a, b| b.len().cmp(&a.len()));
        let mut patt = lit(&list[0]);
        for w in &list[1..] {
            patt = patt.or(lit(w));
        }
        return patt.seq(word_chars.not());
    }

    let members: HashSet<String> = list
        .into_iter()
        .map(|w| {
            if case_insensitive {
                w.to_ascii_lowercase()
            } else {
                w
            }
        })
        .collect();
    guard(word_chars.at_least(1), move |text, start, end| {
        let mut w = String::from_utf8_lossy(&text.as_bytes()[start..end]).into_owned();
        if case_insensitive {
            w.make_ascii_lowercase();
        }
        if members.contains(&w) {
            Some(end)
        } else {
            None
        }
    })
}
