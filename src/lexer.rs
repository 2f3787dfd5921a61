//! The lexer object: named rules, tags, fold points, word lists, and
//! embedding.
//!
//! A lexer is declarative state. Nothing here executes patterns; the
//! grammar compiler lowers a lexer (and its embedded children) into a
//! single runnable grammar, and every mutation below invalidates that
//! compiled form.

use crate::error::Error;
use crate::folder::{FoldFn, FoldPoint};
use crate::grammar::{self, Compiled};
use crate::host::Host;
use crate::patterns;
use crate::peg::{cap_const, cap_pos, never, var, Pattern};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// The fallback tag attached to otherwise-unmatched text.
pub const DEFAULT: &str = "default";
/// Tag for inter-token whitespace; lexers tag it as `whitespace.<name>`.
pub const WHITESPACE: &str = "whitespace";
/// Tag for comments.
pub const COMMENT: &str = "comment";
/// Tag for string literals.
pub const STRING: &str = "string";
/// Tag for numeric literals.
pub const NUMBER: &str = "number";
/// Tag for language keywords.
pub const KEYWORD: &str = "keyword";
/// Tag for identifiers.
pub const IDENTIFIER: &str = "identifier";
/// Tag for operators and punctuation.
pub const OPERATOR: &str = "operator";
/// Tag for invalid or unexpected input.
pub const ERROR: &str = "error";
/// Tag for preprocessor directives.
pub const PREPROCESSOR: &str = "preprocessor";
/// Tag for constants.
pub const CONSTANT: &str = "constant";
/// Tag for variables.
pub const VARIABLE: &str = "variable";
/// Tag for function names.
pub const FUNCTION: &str = "function";
/// Tag for class names.
pub const CLASS: &str = "class";
/// Tag for type names.
pub const TYPE: &str = "type";
/// Tag for labels.
pub const LABEL: &str = "label";
/// Tag for regular expression literals.
pub const REGEX: &str = "regex";
/// Tag for regions handed to an embedded lexer.
pub const EMBEDDED: &str = "embedded";
/// Tag for markup tags.
pub const TAG: &str = "tag";
/// Tag for markup attributes.
pub const ATTRIBUTE: &str = "attribute";
/// Tag for builtin functions.
pub const FUNCTION_BUILTIN: &str = "function.builtin";
/// Tag for builtin constants.
pub const CONSTANT_BUILTIN: &str = "constant.builtin";
/// Tag for method calls.
pub const FUNCTION_METHOD: &str = "function.method";
/// Tag for builtin variables.
pub const VARIABLE_BUILTIN: &str = "variable.builtin";
/// Tag for annotations.
pub const ANNOTATION: &str = "annotation";

/// Tags every lexer starts with, at style numbers 1 through 24.
const DEFAULT_TAGS: [&str; 24] = [
    WHITESPACE,
    COMMENT,
    STRING,
    NUMBER,
    KEYWORD,
    IDENTIFIER,
    OPERATOR,
    ERROR,
    PREPROCESSOR,
    CONSTANT,
    VARIABLE,
    FUNCTION,
    CLASS,
    TYPE,
    LABEL,
    REGEX,
    EMBEDDED,
    FUNCTION_BUILTIN,
    CONSTANT_BUILTIN,
    FUNCTION_METHOD,
    TAG,
    ATTRIBUTE,
    VARIABLE_BUILTIN,
    ANNOTATION,
];

/// Host-predefined styles, fixed at numbers 33 through 40.
const PREDEFINED_TAGS: [&str; 8] = [
    DEFAULT,
    "line.number",
    "brace.light",
    "brace.bad",
    "control.char",
    "indent.guide",
    "call.tip",
    "fold.display.text",
];

/// First style number of the host-predefined band.
const BAND_START: usize = 33;
/// Last style number of the host-predefined band.
const BAND_END: usize = 40;
/// Highest permitted style number.
const MAX_STYLE: usize = 256;

/// Construction options for [`Lexer::new`].
pub struct Options {
    lex_by_line: bool,
    fold_by_indentation: bool,
    case_insensitive_fold_points: bool,
    no_user_word_lists: bool,
    num_user_word_lists: usize,
    inherit: Option<Lexer>,
}

impl Options {
    /// Create the default options.
    pub fn new() -> Self {
        Options {
            lex_by_line: false,
            fold_by_indentation: false,
            case_insensitive_fold_points: false,
            no_user_word_lists: false,
            num_user_word_lists: 4,
            inherit: None,
        }
    }

    /// Re-run the grammar on each line instead of the whole chunk.
    pub fn lex_by_line(mut self, enabled: bool) -> Self {
        self.lex_by_line = enabled;
        self
    }

    /// Fold by indentation instead of fold-point symbols.
    pub fn fold_by_indentation(mut self, enabled: bool) -> Self {
        self.fold_by_indentation = enabled;
        self
    }

    /// Lowercase fold-point symbols on registration and scan.
    pub fn case_insensitive_fold_points(mut self, enabled: bool) -> Self {
        self.case_insensitive_fold_points = enabled;
        self
    }

    /// Disable host-settable word-list slots.
    pub fn no_user_word_lists(mut self, disabled: bool) -> Self {
        self.no_user_word_lists = disabled;
        self
    }

    /// Number of host-settable word-list slots (default 4).
    pub fn num_user_word_lists(mut self, n: usize) -> Self {
        self.num_user_word_lists = n;
        self
    }

    /// Declare a proxy lexer: mutations forward to `parent`, and loading
    /// the proxy yields the parent as the effective lexer.
    pub fn inherit(mut self, parent: Lexer) -> Self {
        self.inherit = Some(parent);
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct WordList {
    pub(crate) name: String,
    pub(crate) words: Vec<String>,
    pub(crate) case_insensitive: bool,
}

#[derive(Clone)]
pub(crate) struct Embedded {
    pub(crate) lexer: Lexer,
    pub(crate) start: Pattern,
    pub(crate) end: Pattern,
}

/// A syntax-highlighting lexer: an ordered rule list plus the state the
/// folder and host need (tags, fold points, word lists, children).
#[derive(Clone)]
pub struct Lexer {
    pub(crate) name: String,
    pub(crate) parent_name: Option<String>,
    pub(crate) proxy: bool,
    pub(crate) parent: Option<Box<Lexer>>,
    pub(crate) rules: Vec<(String, Pattern)>,
    pub(crate) tags: HashMap<Rc<str>, usize>,
    pub(crate) extra_tags: Vec<Rc<str>>,
    next_style: usize,
    pub(crate) fold_points: HashMap<String, HashMap<String, FoldPoint>>,
    pub(crate) fold_symbols: Vec<String>,
    pub(crate) word_lists: Vec<WordList>,
    pub(crate) children: Vec<Embedded>,
    pub(crate) lex_by_line: bool,
    pub(crate) fold_by_indentation: bool,
    pub(crate) case_insensitive_fold_points: bool,
    no_user_word_lists: bool,
    num_user_word_lists: usize,
    pub(crate) cache: Option<Compiled>,
}

impl Lexer {
    /// Create a lexer named `name`.
    ///
    /// The new lexer carries the predefined tag table and an automatic
    /// `whitespace` rule tagging runs of whitespace as
    /// `whitespace.<name>`. Definitions that need different whitespace
    /// handling re-add or modify the `whitespace` rule.
    pub fn new(name: &str, opts: Options) -> Lexer {
        let mut lexer = Lexer {
            name: name.to_string(),
            parent_name: None,
            proxy: opts.inherit.is_some(),
            parent: opts.inherit.map(Box::new),
            rules: Vec::new(),
            tags: HashMap::new(),
            extra_tags: Vec::new(),
            next_style: DEFAULT_TAGS.len() + 1,
            fold_points: HashMap::new(),
            fold_symbols: Vec::new(),
            word_lists: Vec::new(),
            children: Vec::new(),
            lex_by_line: opts.lex_by_line,
            fold_by_indentation: opts.fold_by_indentation,
            case_insensitive_fold_points: opts.case_insensitive_fold_points,
            no_user_word_lists: opts.no_user_word_lists,
            num_user_word_lists: opts.num_user_word_lists,
            cache: None,
        };
        for (i, tag) in DEFAULT_TAGS.iter().enumerate() {
            lexer.tags.insert(Rc::from(*tag), i + 1);
        }
        for (i, tag) in PREDEFINED_TAGS.iter().enumerate() {
            lexer.tags.insert(Rc::from(*tag), BAND_START + i);
        }
        let ws_tag = format!("{}.{}", WHITESPACE, name);
        let ws = lexer
            .tag(&ws_tag, patterns::space().at_least(1))
            .unwrap_or_else(|_| never());
        lexer.add_rule(WHITESPACE, ws);
        lexer
    }

    /// The lexer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this lexer was declared as a proxy for another.
    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    /// Build a tagged pattern: matching it captures `(name, end_position)`.
    ///
    /// Registers `name` with the next free style number if it is new,
    /// skipping the host-predefined 33–40 band. On a proxy the name is also
    /// registered with the parent.
    pub fn tag(&mut self, name: &str, patt: Pattern) -> Result<Pattern, Error> {
        let key = self.register_tag(name)?;
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                parent.register_tag(name)?;
            }
        }
        Ok(cap_const(key).seq(patt).seq(cap_pos()))
    }

    fn register_tag(&mut self, name: &str) -> Result<Rc<str>, Error> {
        if let Some((key, _)) = self.tags.get_key_value(name) {
            return Ok(key.clone());
        }
        let mut style = self.next_style;
        if (BAND_START..=BAND_END).contains(&style) {
            style = BAND_END + 1;
        }
        if style > MAX_STYLE {
            return Err(Error::StyleOverflow(name.to_string()));
        }
        let key: Rc<str> = Rc::from(name);
        self.tags.insert(key.clone(), style);
        self.extra_tags.push(key.clone());
        self.next_style = style + 1;
        Ok(key)
    }

    /// Append a rule. Rule order is significant: earlier rules win at the
    /// same position.
    ///
    /// Re-adding `whitespace` modifies the automatic rule in place instead
    /// of appending a second one.
    pub fn add_rule(&mut self, id: &str, patt: Pattern) {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.add_rule(id, patt);
            }
        }
        if id == WHITESPACE {
            if let Some(rule) = self.rules.iter_mut().find(|(rid, _)| rid == id) {
                rule.1 = patt;
                self.cache = None;
                return;
            }
        }
        self.rules.push((id.to_string(), patt));
        self.cache = None;
    }

    /// Replace the rule with the given id.
    pub fn modify_rule(&mut self, id: &str, patt: Pattern) -> Result<(), Error> {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.modify_rule(id, patt);
            }
        }
        match self.rules.iter_mut().find(|(rid, _)| rid == id) {
            Some(rule) => {
                rule.1 = patt;
                self.cache = None;
                Ok(())
            }
            None => Err(Error::RuleNotFound(id.to_string())),
        }
    }

    /// A by-name reference to the rule in the compiled grammar, or `None`
    /// if no such rule exists.
    pub fn get_rule(&self, id: &str) -> Option<Pattern> {
        if self.proxy {
            return self.parent.as_ref().and_then(|p| p.get_rule(id));
        }
        if self.rules.iter().any(|(rid, _)| rid == id) {
            Some(var(&format!("{}.{}", self.name, id)))
        } else {
            None
        }
    }

    /// The ids of the lexer's rules, in order.
    pub fn rule_ids(&self) -> Vec<&str> {
        if self.proxy {
            if let Some(parent) = self.parent.as_ref() {
                return parent.rule_ids();
            }
        }
        self.rules.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Reserve a word-list slot and return a by-name reference to it.
    ///
    /// Safe to call before the slot is populated; an empty slot matches
    /// nothing.
    pub fn get_word_list(&mut self, name: &str, case_insensitive: bool) -> Pattern {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.get_word_list(name, case_insensitive);
            }
        }
        let index = match self.word_lists.iter().position(|wl| wl.name == name) {
            Some(i) => i,
            None => {
                self.word_lists.push(WordList {
                    name: name.to_string(),
                    words: Vec::new(),
                    case_insensitive,
                });
                self.cache = None;
                self.word_lists.len() - 1
            }
        };
        var(&format!("{}_wordlist{}", self.name, index + 1))
    }

    /// Populate (or with `append`, extend) the named word-list slot.
    ///
    /// `words` is whitespace-separated. The literal string `"scintillua"`
    /// is a host hand-off marker and a no-op. An unknown name reserves a
    /// new slot, so load-time extension does not depend on declaration
    /// order.
    pub fn set_word_list(&mut self, name: &str, words: &str, append: bool) -> Result<(), Error> {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.set_word_list(name, words, append);
            }
        }
        if words == "scintillua" {
            return Ok(());
        }
        let index = match self.word_lists.iter().position(|wl| wl.name == name) {
            Some(i) => i,
            None => {
                self.word_lists.push(WordList {
                    name: name.to_string(),
                    words: Vec::new(),
                    case_insensitive: false,
                });
                self.word_lists.len() - 1
            }
        };
        let slot = &mut self.word_lists[index];
        if !append {
            slot.words.clear();
        }
        slot.words.extend(words.split_whitespace().map(String::from));
        self.cache = None;
        Ok(())
    }

    /// Populate a word list by its one-based host slot index.
    pub fn set_word_list_index(
        &mut self,
        index: usize,
        words: &str,
        append: bool,
    ) -> Result<(), Error> {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.set_word_list_index(index, words, append);
            }
        }
        if self.no_user_word_lists || index == 0 || index > self.num_user_word_lists {
            return Err(Error::WordListUnknown(index.to_string()));
        }
        let name = match self.word_lists.get(index - 1) {
            Some(slot) => slot.name.clone(),
            None => return Err(Error::WordListUnknown(index.to_string())),
        };
        self.set_word_list(&name, words, append)
    }

    /// Embed `child` in this lexer, switching in where `start` matches and
    /// back out where `end` matches.
    ///
    /// The child's extra tags, fold points, and word lists (under
    /// `<child>.<slot>` keys) are mirrored here so one compiled grammar
    /// serves both. The child keeps this lexer as its grammar root, which
    /// is what lets a child that embeds *itself* into a parent (PHP into
    /// HTML) be loaded and lexed directly.
    ///
    /// The child's view of the parent is a snapshot taken by this call:
    /// siblings embedded afterward are visible when lexing through the
    /// parent, but not through a child handed out earlier.
    pub fn embed(&mut self, child: &mut Lexer, start: Pattern, end: Pattern) -> Result<(), Error> {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.embed(child, start, end);
            }
        }
        if child.rules.is_empty() {
            return Err(Error::EmbedRuleless(child.name.clone()));
        }
        for tag in child.extra_tags.clone() {
            self.register_tag(&tag)?;
        }
        for symbol in &child.fold_symbols {
            if !self.fold_symbols.contains(symbol) {
                self.fold_symbols.push(symbol.clone());
            }
        }
        for (tag, symbols) in &child.fold_points {
            let entry = self.fold_points.entry(tag.clone()).or_default();
            for (symbol, point) in symbols {
                entry.insert(symbol.clone(), point.clone());
            }
        }
        for wl in &child.word_lists {
            let key = format!("{}.{}", child.name, wl.name);
            if !self.word_lists.iter().any(|w| w.name == key) {
                self.word_lists.push(WordList {
                    name: key,
                    words: wl.words.clone(),
                    case_insensitive: wl.case_insensitive,
                });
            }
        }
        self.children.push(Embedded {
            lexer: child.clone(),
            start,
            end,
        });
        self.cache = None;
        child.parent_name = Some(self.name.clone());
        child.parent = Some(Box::new(self.clone()));
        child.cache = None;
        Ok(())
    }

    /// Register `start` (+1) and `end` (−1) as fold symbols for `tag`.
    pub fn add_fold_point(&mut self, tag: &str, start: &str, end: &str) {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.add_fold_point(tag, start, end);
            }
        }
        let (start, end) = if self.case_insensitive_fold_points {
            (start.to_ascii_lowercase(), end.to_ascii_lowercase())
        } else {
            (start.to_string(), end.to_string())
        };
        let entry = self.fold_points.entry(tag.to_string()).or_default();
        entry.insert(start.clone(), FoldPoint::Delta(1));
        entry.insert(end.clone(), FoldPoint::Delta(-1));
        for symbol in [start, end] {
            if !self.fold_symbols.contains(&symbol) {
                self.fold_symbols.push(symbol);
            }
        }
    }

    /// Register `symbol` as a fold point for `tag` whose delta is decided
    /// by `predicate` at fold time.
    pub fn add_fold_predicate(&mut self, tag: &str, symbol: &str, predicate: FoldFn) {
        if self.proxy {
            if let Some(parent) = self.parent.as_mut() {
                return parent.add_fold_predicate(tag, symbol, predicate);
            }
        }
        let symbol = if self.case_insensitive_fold_points {
            symbol.to_ascii_lowercase()
        } else {
            symbol.to_string()
        };
        self.fold_points
            .entry(tag.to_string())
            .or_default()
            .insert(symbol.clone(), FoldPoint::Dynamic(predicate));
        if !self.fold_symbols.contains(&symbol) {
            self.fold_symbols.push(symbol);
        }
    }

    /// The style number assigned to `tag`, if registered.
    pub fn style_of(&self, tag: &str) -> Option<usize> {
        self.grammar_root().tags.get(tag).copied()
    }

    /// The tag assigned to `style`, if any.
    pub fn tag_of(&self, style: usize) -> Option<&str> {
        self.grammar_root()
            .tags
            .iter()
            .find(|(_, &s)| s == style)
            .map(|(k, _)| &**k)
    }

    /// All registered tag names, ordered by style number.
    pub fn tag_names(&self) -> Vec<&str> {
        let mut entries: Vec<(usize, &str)> = self
            .grammar_root()
            .tags
            .iter()
            .map(|(k, &s)| (s, &**k))
            .collect();
        entries.sort();
        entries.into_iter().map(|(_, k)| k).collect()
    }

    /// Tag `text`, returning `(tag, end)` runs with one-based exclusive
    /// end positions covering the whole chunk.
    ///
    /// `init_style` is the style at the start of the chunk; when it maps to
    /// a `whitespace.<lang>` tag of an embedded language, lexing resumes
    /// inside that language.
    pub fn lex(&mut self, text: &str, init_style: usize) -> Vec<(Rc<str>, usize)> {
        crate::tagger::lex(self, text, init_style)
    }

    /// Compute fold levels for each line of `text`.
    ///
    /// `start_pos` is the one-based byte position of the chunk, `start_line`
    /// its one-based first line, and `start_level` the encoded level that
    /// line starts at. The host supplies per-position styles, previously
    /// computed levels, and configuration properties.
    pub fn fold(
        &self,
        text: &str,
        start_pos: usize,
        start_line: usize,
        start_level: i32,
        host: &dyn Host,
    ) -> BTreeMap<usize, i32> {
        crate::folder::fold(self, text, start_pos, start_line, start_level, host)
    }

    /// The lexer whose declarative state the grammar is compiled from: the
    /// embedding parent when this lexer lives inside one, otherwise self.
    pub(crate) fn grammar_root(&self) -> &Lexer {
        match &self.parent {
            Some(parent) => parent,
            None => self,
        }
    }

    pub(crate) fn tag_rc(&self, name: &str) -> Rc<str> {
        self.grammar_root()
            .tags
            .get_key_value(name)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| Rc::from(name))
    }

    /// Compile (or reuse) the grammar for the start rule selected by
    /// `init_style`.
    pub(crate) fn ensure_compiled(&mut self, init_style: usize) {
        let start = self.select_start(init_style);
        if matches!(&self.cache, Some(c) if c.start == start) {
            return;
        }
        let compiled = grammar::compile(self.grammar_root(), &start);
        self.cache = Some(Compiled {
            start,
            grammar: compiled,
        });
    }

    fn select_start(&self, init_style: usize) -> String {
        let root = self.grammar_root();
        let mut start = if self.proxy {
            root.name.clone()
        } else if self.parent.is_some() {
            // A self-embedded child starts in its parent's rules.
            self.parent_name
                .clone()
                .unwrap_or_else(|| root.name.clone())
        } else {
            self.name.clone()
        };
        if !root.children.is_empty() {
            if let Some(tag) = self.tag_of(init_style) {
                let prefix = format!("{}.", WHITESPACE);
                if let Some(lang) = tag.strip_prefix(&prefix) {
                    if lang == root.name || root.has_descendant(lang) {
                        start = lang.to_string();
                    } else if self.parent_name.as_deref() == Some(lang) {
                        // A proxy's former name resolves to the effective
                        // lexer.
                        start = root.name.clone();
                    }
                }
            }
        }
        start
    }

    fn has_descendant(&self, name: &str) -> bool {
        self.children
            .iter()
            .any(|c| c.lexer.name == name || c.lexer.has_descendant(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peg::lit;

    #[test]
    fn test_new_seeds_tags() {
        let lexer = Lexer::new("test", Options::new());
        assert_eq!(lexer.style_of(WHITESPACE), Some(1));
        assert_eq!(lexer.style_of(ANNOTATION), Some(24));
        assert_eq!(lexer.style_of(DEFAULT), Some(33));
        assert_eq!(lexer.style_of("fold.display.text"), Some(40));
        // The automatic whitespace rule registered a per-lexer tag.
        assert_eq!(lexer.style_of("whitespace.test"), Some(25));
    }

    #[test]
    fn test_tag_assigns_sequential_styles() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.tag("custom.one", lit("a")).unwrap();
        lexer.tag("custom.two", lit("b")).unwrap();
        assert_eq!(lexer.style_of("custom.one"), Some(26));
        assert_eq!(lexer.style_of("custom.two"), Some(27));
        // Re-tagging reuses the existing number.
        lexer.tag("custom.one", lit("c")).unwrap();
        assert_eq!(lexer.style_of("custom.one"), Some(26));
    }

    #[test]
    fn test_tag_skips_predefined_band() {
        let mut lexer = Lexer::new("test", Options::new());
        let mut last = 0;
        for i in 0..10 {
            lexer.tag(&format!("t{}", i), lit("x")).unwrap();
            last = lexer.style_of(&format!("t{}", i)).unwrap();
        }
        // 26..=32 then jump over the band to 41.
        assert_eq!(lexer.style_of("t6"), Some(32));
        assert_eq!(lexer.style_of("t7"), Some(41));
        assert_eq!(last, 43);
    }

    #[test]
    fn test_style_overflow() {
        let mut lexer = Lexer::new("test", Options::new());
        let mut result = Ok(never());
        for i in 0..300 {
            result = lexer.tag(&format!("t{}", i), lit("x"));
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(Error::StyleOverflow(_))));
    }

    #[test]
    fn test_add_rule_order_and_whitespace_legacy() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.add_rule("one", lit("1"));
        lexer.add_rule("two", lit("2"));
        assert_eq!(lexer.rule_ids(), vec!["whitespace", "one", "two"]);
        // Re-adding whitespace modifies in place rather than appending.
        lexer.add_rule(WHITESPACE, lit("w"));
        assert_eq!(lexer.rule_ids(), vec!["whitespace", "one", "two"]);
    }

    #[test]
    fn test_modify_rule_missing() {
        let mut lexer = Lexer::new("test", Options::new());
        let err = lexer.modify_rule("nope", lit("x"));
        assert_eq!(err, Err(Error::RuleNotFound("nope".into())));
    }

    #[test]
    fn test_get_rule_reference() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.add_rule("num", lit("1"));
        assert!(lexer.get_rule("num").is_some());
        assert!(lexer.get_rule("missing").is_none());
    }

    #[test]
    fn test_word_list_slot_before_populate() {
        let mut lexer = Lexer::new("test", Options::new());
        let _patt = lexer.get_word_list("keywords", false);
        lexer.set_word_list("keywords", "if then else", false).unwrap();
        assert_eq!(lexer.word_lists.len(), 1);
        assert_eq!(lexer.word_lists[0].words.len(), 3);
        lexer.set_word_list("keywords", "end", true).unwrap();
        assert_eq!(lexer.word_lists[0].words.len(), 4);
    }

    #[test]
    fn test_word_list_scintillua_hand_off() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.get_word_list("keywords", false);
        lexer.set_word_list("keywords", "scintillua", false).unwrap();
        assert!(lexer.word_lists[0].words.is_empty());
    }

    #[test]
    fn test_word_list_by_index() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.get_word_list("keywords", false);
        lexer.set_word_list_index(1, "a b", false).unwrap();
        assert_eq!(lexer.word_lists[0].words.len(), 2);
        assert!(lexer.set_word_list_index(9, "x", false).is_err());
    }

    #[test]
    fn test_embed_ruleless_child_fails() {
        let mut parent = Lexer::new("parent", Options::new());
        let mut child = Lexer::new("child", Options::new());
        child.rules.clear();
        let err = parent.embed(&mut child, lit("<"), lit(">"));
        assert_eq!(err, Err(Error::EmbedRuleless("child".into())));
    }

    #[test]
    fn test_embed_mirrors_state() {
        let mut parent = Lexer::new("parent", Options::new());
        let mut child = Lexer::new("child", Options::new());
        child.tag("child.special", lit("x")).unwrap();
        child.add_rule("special", lit("x"));
        child.add_fold_point(OPERATOR, "{", "}");
        child.get_word_list("props", false);
        parent.embed(&mut child, lit("<"), lit(">")).unwrap();

        assert!(parent.style_of("child.special").is_some());
        assert!(parent.style_of("whitespace.child").is_some());
        assert!(parent.fold_points.contains_key(OPERATOR));
        assert_eq!(parent.fold_symbols, vec!["{", "}"]);
        assert!(parent.word_lists.iter().any(|w| w.name == "child.props"));
        // The child now compiles through the parent.
        assert_eq!(child.grammar_root().name, "parent");
    }

    #[test]
    fn test_proxy_forwards_mutations() {
        let parent = Lexer::new("base", Options::new());
        let mut proxy = Lexer::new("skin", Options::new().inherit(parent));
        assert!(proxy.is_proxy());
        proxy.add_rule("extra", lit("!"));
        proxy.add_fold_point(OPERATOR, "(", ")");
        let forwarded = proxy.parent.as_ref().unwrap();
        assert!(forwarded.rules.iter().any(|(id, _)| id == "extra"));
        assert!(forwarded.fold_points.contains_key(OPERATOR));
        // The proxy's whitespace rule re-tagged the parent's whitespace.
        assert!(forwarded.tags.contains_key("whitespace.skin"));
    }

    #[test]
    fn test_fold_point_case_insensitive_registration() {
        let mut lexer = Lexer::new("test", Options::new().case_insensitive_fold_points(true));
        lexer.add_fold_point(KEYWORD, "IF", "END");
        assert_eq!(lexer.fold_symbols, vec!["if", "end"]);
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.add_rule("one", lit("1"));
        lexer.ensure_compiled(0);
        assert!(lexer.cache.is_some());
        lexer.add_rule("two", lit("2"));
        assert!(lexer.cache.is_none());
        lexer.ensure_compiled(0);
        assert!(lexer.cache.is_some());
        lexer.get_word_list("kw", false);
        assert!(lexer.cache.is_none());
    }

    #[test]
    fn test_tag_growth_keeps_cache() {
        let mut lexer = Lexer::new("test", Options::new());
        lexer.add_rule("one", lit("1"));
        lexer.ensure_compiled(0);
        lexer.tag("late.tag", lit("x")).unwrap();
        assert!(lexer.cache.is_some());
    }
}
