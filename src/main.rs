//! CLI tool for the taglex framework.
//!
//! Usage:
//!   taglex <FILE>              Tag a file with the built-in demo language
//!   taglex --code "<CODE>"     Tag inline code
//!   taglex --fold <FILE>       Print fold levels instead of tag runs
//!   taglex --help              Show help
//!   taglex --version           Show version

const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::env;
use std::fs;
use std::process;
use std::rc::Rc;

use taglex::folder::{FOLD_BASE, FOLD_BLANK, FOLD_HEADER};
use taglex::{patterns, peg, Error, Lexer, Loader, Options, PropertyHost};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let mut source = String::new();
    let mut output_format = OutputFormat::Pretty;
    let mut fold = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            "--version" | "-V" => {
                println!("taglex {}", VERSION);
                process::exit(0);
            }
            "--fold" | "-f" => {
                fold = true;
                i += 1;
            }
            "--output" | "-o" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_format = match args[i + 1].as_str() {
                    "pretty" => OutputFormat::Pretty,
                    "json" => OutputFormat::Json,
                    "debug" => OutputFormat::Debug,
                    _ => {
                        eprintln!("Error: unknown output format '{}'", args[i + 1]);
                        eprintln!("Valid formats: pretty, json, debug");
                        process::exit(1);
                    }
                };
                i += 2;
            }
            "--code" | "-c" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --code requires an argument");
                    process::exit(1);
                }
                source = args[i + 1].clone();
                i += 2;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: unknown option '{}'", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
            file => {
                match fs::read_to_string(file) {
                    Ok(content) => source = content,
                    Err(e) => {
                        eprintln!("Error reading file '{}': {}", file, e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
        }
    }

    if source.is_empty() {
        eprintln!("Error: no input provided");
        print_usage(&args[0]);
        process::exit(1);
    }

    let mut loader = Loader::new();
    loader.register("demo", demo_language);
    let lexer = match loader.load("demo") {
        Ok(lexer) => lexer,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let runs = lexer.lex(&source, 0);

    if fold {
        print_folds(lexer, &source, &runs);
        return;
    }

    match output_format {
        OutputFormat::Pretty => print_pretty(&runs, &source),
        OutputFormat::Json => print_json(&runs, &source),
        OutputFormat::Debug => print_debug(&runs),
    }
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Pretty,
    Json,
    Debug,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <FILE>", program);
    eprintln!("       {} --code \"<CODE>\"", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --code <CODE>    Tag inline code");
    eprintln!("  -o, --output <FMT>   Output format: pretty, json, debug (default: pretty)");
    eprintln!("  -f, --fold           Print fold levels instead of tag runs");
    eprintln!("  -h, --help           Show this help message");
    eprintln!("  -V, --version        Show version information");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} program.src", program);
    eprintln!("  {} --code \"let x = 42;\"", program);
    eprintln!("  {} --fold program.src", program);
}

/// A small C-like language definition exercising the framework.
fn demo_language(name: &str) -> Result<Lexer, Error> {
    let mut lexer = Lexer::new(name, Options::new());

    let keyword = lexer.tag(
        taglex::KEYWORD,
        patterns::word_match(
            [
                "if", "else", "while", "for", "fn", "let", "const", "return", "break", "continue",
                "true", "false", "struct", "enum", "match",
            ],
            false,
        ),
    )?;
    lexer.add_rule("keyword", keyword);

    let comment = lexer.tag(
        taglex::COMMENT,
        patterns::to_eol("//", false).or(patterns::delimited_range(
            "/*",
            Some("*/"),
            false,
            Some(false),
            false,
        )),
    )?;
    lexer.add_rule("comment", comment);

    let string = lexer.tag(
        taglex::STRING,
        patterns::delimited_range("\"", None, true, None, false),
    )?;
    lexer.add_rule("string", string);

    let number = lexer.tag(taglex::NUMBER, patterns::number())?;
    lexer.add_rule("number", number);

    let identifier = lexer.tag(taglex::IDENTIFIER, patterns::word())?;
    lexer.add_rule("identifier", identifier);

    let operator = lexer.tag(taglex::OPERATOR, peg::set("+-*/%<>=!&|^~(){}[];,.:"))?;
    lexer.add_rule("operator", operator);

    lexer.add_fold_point(taglex::OPERATOR, "{", "}");
    lexer.add_fold_point(taglex::COMMENT, "/*", "*/");
    Ok(lexer)
}

fn print_pretty(runs: &[(Rc<str>, usize)], source: &str) {
    let mut start = 0;
    for (tag, end) in runs {
        let lexeme = String::from_utf8_lossy(&source.as_bytes()[start..end - 1]);
        println!("{:<20} {:?}", tag, lexeme);
        start = end - 1;
    }
}

fn print_json(runs: &[(Rc<str>, usize)], source: &str) {
    println!("[");
    let mut start = 0;
    for (i, (tag, end)) in runs.iter().enumerate() {
        let lexeme = String::from_utf8_lossy(&source.as_bytes()[start..end - 1]);
        let comma = if i < runs.len() - 1 { "," } else { "" };
        println!(
            r#"  {{ "tag": "{}", "lexeme": {}, "start": {}, "end": {} }}{}"#,
            tag,
            json_escape(&lexeme),
            start + 1,
            end,
            comma
        );
        start = end - 1;
    }
    println!("]");
}

fn print_debug(runs: &[(Rc<str>, usize)]) {
    for run in runs {
        println!("{:?}", run);
    }
}

fn print_folds(lexer: &Lexer, source: &str, runs: &[(Rc<str>, usize)]) {
    let mut host = PropertyHost::new();
    host.set_property("fold", "1");
    host.set_property("fold.scintillua.on.zero.sum.lines", "1");
    host.record_runs(runs);

    let folds = lexer.fold(source, 1, 1, FOLD_BASE, &host);
    for (line, level) in &folds {
        let depth = (level & !(FOLD_HEADER | FOLD_BLANK)) - FOLD_BASE;
        let mut flags = String::new();
        if level & FOLD_HEADER != 0 {
            flags.push_str(" header");
        }
        if level & FOLD_BLANK != 0 {
            flags.push_str(" blank");
        }
        println!("{:>4}  level {}{}", line, depth, flags);
    }
}

fn json_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
