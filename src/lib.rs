//! # Lexicomb - Lexer and Grammar Combinator Library
//!
//! Lexicomb turns source text into a tree in two stages. A [`Lexer`] built
//! from token layouts produces tokens on demand, and a [`Grammar`] of named
//! rules consumes them with backtracking combinators.
//!
//! - **No partial effects**: a segment that fails leaves the token stream where it found it
//! - **Useful diagnostics**: alternatives report the failure that got furthest,
//!   with line and column
//! - **Plain data out**: results are [`Value`] trees that serialize with serde
//!
//! ```
//! use lexicomb::{Grammar, Lexer, Matcher, Rule, TokenLayout};
//!
//! let lexer = Lexer::builder()
//!     .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
//!     .layout(TokenLayout::new("identifier").matcher(Matcher::pattern("[a-z]+").unwrap()))
//!     .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("(),")))
//!     .skip("whitespace")
//!     .build();
//!
//! let mut grammar = Grammar::new();
//! grammar
//!     .define(
//!         Rule::new("call")
//!             .kind("call")
//!             .expect_type("identifier")
//!             .key("callee")
//!             .delimited(
//!                 lexicomb::expect("punctuation", "("),
//!                 lexicomb::expect("punctuation", ")"),
//!                 lexicomb::expect("punctuation", ","),
//!                 lexicomb::expect_type("identifier"),
//!             )
//!             .key("args"),
//!     )
//!     .unwrap();
//!
//! let call = grammar.parser("call").parse_str(&lexer, "f(a, b)").unwrap();
//! assert_eq!(call.kind(), Some("call"));
//! assert_eq!(call.get("args").and_then(|args| args.as_list()).map(|args| args.len()), Some(2));
//! ```

pub mod between;
pub mod binary;
pub mod cursor;
pub mod delimited;
pub mod driver;
pub mod error;
pub mod expect;
pub mod grammar;
pub mod lazy;
pub mod lexer;
pub mod one_of;
pub mod optional;
pub mod position;
pub mod result;
pub mod rule;
pub mod sample;
pub mod segment;
pub mod token;
pub mod token_stream;
pub mod until;
pub mod value;

pub use between::between;
pub use binary::{Associativity, Tier, binary};
pub use cursor::InputCursor;
pub use delimited::delimited;
pub use driver::Parser;
pub use error::{GrammarError, LexError, ParseError};
pub use expect::{expect, expect_type, fail, maybe, succeed, token};
pub use grammar::{Grammar, GrammarConfig};
pub use lazy::lazy;
pub use lexer::{Lexer, LexerBuilder, Matcher, TokenLayout, Transform, UnknownChars};
pub use one_of::one_of;
pub use optional::optional;
pub use position::{Position, Span};
pub use result::{Flatten, MatchResult};
pub use rule::Rule;
pub use segment::Segment;
pub use token::{Token, TokenValue};
pub use token_stream::TokenStream;
pub use until::{until, until_eof};
pub use value::{Object, Value};
