#![no_std]

#![cfg_attr(
    not(test),
    deny(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing,
        clippy::string_slice,
        clippy::arithmetic_side_effects,
        clippy::panicking_unwrap,
        clippy::out_of_bounds_indexing,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
    )
)]
#![cfg_attr(not(test), warn(clippy::missing_panics_doc))]

//! Line oriented lexer for Z33 assembly source.
//!
//! The lexer is a small finite state machine driven by an ordered rule
//! table. Each line is tokenized on its own, starting from the
//! [`LexerState`] the previous line ended in, so an editor can re-lex a
//! single line after an edit without rescanning the buffer:
//!
//! ```ignore
//!     let table = RuleTable::new()?;
//!     let lexer = Lexer::new(&table);
//!     let mut state = LexerState::new();
//!     for token in lexer.line("loop: add %a, 1", &mut state) { .. }
//! ```
//!
//! Error tokens are advisory. The lexer never fails on its input, every
//! line is covered by tokens and always ends with a zero width
//! [`TokenKind::EndOfLine`] token.

use serde::{Deserialize, Serialize};
use variant_count::VariantCount;

pub mod lexer;
pub mod mnemonics;
pub mod rules;

pub use lexer::{Lexer, LexerState, LineTokens, StateError, TokenizeError, MAX_STATE_DEPTH};
pub use rules::{Fragment, Pattern, Rule, RuleTable, RuleTableError, Transition};


/// Classification of a span of source text.
#[derive(VariantCount, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Command,
    Register,
    Label,
    Macro,
    Number,
    Comment,
    Operator,
    EndOfLine,
    Error,
    ErrorMissingComma,
    /// Run of spaces or tabs between other tokens.
    Whitespace,
    /// Text without a class: a word no rule claims, or a single
    /// character nothing matched.
    Unclassified,
}

impl TokenKind {
    pub const ALL: [TokenKind; TokenKind::VARIANT_COUNT] = [
        TokenKind::Command,
        TokenKind::Register,
        TokenKind::Label,
        TokenKind::Macro,
        TokenKind::Number,
        TokenKind::Comment,
        TokenKind::Operator,
        TokenKind::EndOfLine,
        TokenKind::Error,
        TokenKind::ErrorMissingComma,
        TokenKind::Whitespace,
        TokenKind::Unclassified,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Command => "command",
            TokenKind::Register => "register",
            TokenKind::Label => "label",
            TokenKind::Macro => "macro",
            TokenKind::Number => "number",
            TokenKind::Comment => "comment",
            TokenKind::Operator => "operator",
            TokenKind::EndOfLine => "eol",
            TokenKind::Error => "error",
            TokenKind::ErrorMissingComma => "error-missing-comma",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Unclassified => "unclassified",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenKind> {
        TokenKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn is_error(self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::ErrorMissingComma)
    }

    /// Position of the kind in [`TokenKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A classified span of one line. `start` and `end` are byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lexing contexts that can be on the state stack.
#[derive(VariantCount, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateName {
    Root,
    Command,
    Idx,
}

impl StateName {
    pub const fn index(self) -> usize {
        self as usize
    }
}
