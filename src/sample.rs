//! A small JavaScript-like language built from the crate's parts
//!
//! It supports function and class declarations, `let`, `if`/`else`,
//! `return`, calls, and binary expressions with the usual precedence.
//!
//! ```
//! use lexicomb::sample;
//!
//! let lexer = sample::lexer().unwrap();
//! let grammar = sample::grammar().unwrap();
//! let program = grammar
//!     .parser(sample::ROOT)
//!     .parse_str(&lexer, "let answer = 6 * 7;")
//!     .unwrap();
//!
//! let body = program.get("body").and_then(|body| body.as_list()).unwrap();
//! assert_eq!(body[0].kind(), Some("let"));
//! ```

use crate::binary::{Tier, binary};
use crate::error::GrammarError;
use crate::expect::expect;
use crate::grammar::Grammar;
use crate::lazy::lazy;
use crate::lexer::{Lexer, Matcher, TokenLayout, Transform};
use crate::rule::Rule;
use crate::segment::Segment;

/// Name of the rule that parses a whole program
pub const ROOT: &str = "program";

pub const KEYWORDS: [&str; 6] = ["function", "class", "let", "if", "else", "return"];

const OPERATORS: [&str; 19] = [
    "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=", "=", "+", "-", "*", "/", "%", "<",
    ">", "!",
];

pub fn lexer() -> Result<Lexer, regex::Error> {
    Ok(Lexer::builder()
        .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+")?))
        .layout(
            TokenLayout::new("comment")
                .matcher(Matcher::pattern(r"//[^\n]*")?)
                .matcher(Matcher::delimited("/*", "*/", None)),
        )
        .layout(
            TokenLayout::new("number")
                .matcher(Matcher::pattern(r"[0-9]+(\.[0-9]+)?")?)
                .transform(Transform::Number),
        )
        .layout(
            TokenLayout::new("string")
                .matcher(Matcher::delimited("\"", "\"", Some('\\')))
                .matcher(Matcher::delimited("'", "'", Some('\\'))),
        )
        .layout(
            TokenLayout::new("identifier")
                .matcher(Matcher::pattern("[A-Za-z_$][A-Za-z0-9_$]*")?)
                .transform(Transform::keywords("keyword", KEYWORDS)),
        )
        .layout(TokenLayout::new("operator").matcher(Matcher::literals(OPERATORS)))
        .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("(){}[];,.:")))
        .skip("whitespace")
        .skip("comment")
        .build())
}

fn punctuation(value: &str) -> Segment {
    expect("punctuation", value)
}

/// Operator tiers, loosest first
pub fn tiers() -> Vec<Tier> {
    vec![
        Tier::right("operator", ["=", "+=", "-=", "*=", "/="]),
        Tier::left("operator", ["||"]),
        Tier::left("operator", ["&&"]),
        Tier::left("operator", ["==", "!="]),
        Tier::left("operator", ["<", "<=", ">", ">="]),
        Tier::left("operator", ["+", "-"]),
        Tier::left("operator", ["*", "/", "%"]),
    ]
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    let mut grammar = Grammar::new();

    grammar
        .define(Rule::new(ROOT).kind("program").until_eof("statement").key("body"))?
        .define(Rule::new("statement").one_of([
            "function",
            "class",
            "if",
            "return",
            "let",
            "expression_statement",
        ]))?
        .define(
            Rule::new("function")
                .kind("function")
                .expect("keyword", "function")
                .expect_type("identifier")
                .key("name")
                .delimited(punctuation("("), punctuation(")"), punctuation(","), "argument")
                .key("args")
                .reference("block")
                .key("body"),
        )?
        .define(
            Rule::new("argument")
                .kind("argument")
                .expect_type("identifier")
                .key("name")
                .optional(
                    Rule::new("default")
                        .expect("operator", "=")
                        .reference("expression")
                        .key("default")
                        .into_segment(),
                ),
        )?
        .define(
            Rule::new("block")
                .expect("punctuation", "{")
                .until(punctuation("}"), "statement"),
        )?
        .define(
            Rule::new("class")
                .kind("class")
                .expect("keyword", "class")
                .expect_type("identifier")
                .key("name")
                .expect("punctuation", "{")
                .until(punctuation("}"), "function")
                .key("members"),
        )?
        .define(
            Rule::new("if")
                .kind("if")
                .expect("keyword", "if")
                .between(punctuation("("), "expression", punctuation(")"))
                .key("condition")
                .reference("block")
                .key("then")
                .optional(
                    Rule::new("else")
                        .expect("keyword", "else")
                        .one_of(["if", "block"])
                        .key("else")
                        .into_segment(),
                ),
        )?
        .define(
            Rule::new("return")
                .kind("return")
                .expect("keyword", "return")
                .optional(lazy("expression").key("value"))
                .expect("punctuation", ";"),
        )?
        .define(
            Rule::new("let")
                .kind("let")
                .expect("keyword", "let")
                .expect_type("identifier")
                .key("name")
                .optional(
                    Rule::new("initializer")
                        .expect("operator", "=")
                        .reference("expression")
                        .key("value")
                        .into_segment(),
                )
                .expect("punctuation", ";"),
        )?
        .define(
            Rule::new("expression_statement")
                .kind("expression")
                .reference("expression")
                .key("expression")
                .expect("punctuation", ";"),
        )?
        .define(Rule::new("expression").then(binary("atom", tiers())))?
        .define(Rule::new("atom").one_of(["call", "paren", "number", "string", "name"]))?
        .define(
            Rule::new("call")
                .kind("call")
                .expect_type("identifier")
                .key("callee")
                .delimited(punctuation("("), punctuation(")"), punctuation(","), "expression")
                .key("args"),
        )?
        .define(Rule::new("paren").between(punctuation("("), "expression", punctuation(")")))?
        .define(Rule::new("number").kind("number").expect_type("number").key("value"))?
        .define(Rule::new("string").kind("string").expect_type("string").key("value"))?
        .define(Rule::new("name").kind("identifier").expect_type("identifier").key("name"))?;

    grammar.validate()?;
    Ok(grammar)
}
