use heapless::Vec;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::rules::{Input, RuleTable, Transition};
use crate::{StateName, Token, TokenKind};

#[cfg(test)]
mod test;

/// Depth of the state stack. The Z33 table never nests deeper than
/// `Root`, `Command`, `Idx`.
pub const MAX_STATE_DEPTH: usize = 8;

type Stack = Vec<StateName, MAX_STATE_DEPTH>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("a state stack can not be empty")]
    Empty,
    #[error("the bottom of a state stack must be the root state")]
    MissingRoot,
    #[error("the root state may only be at the bottom of a state stack")]
    NestedRoot,
    #[error("a state stack of depth {0} is deeper than the lexer allows")]
    TooDeep(usize),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("line has more than {0} tokens")]
    TooManyTokens(usize),
}

/// State stack at a line boundary. It is never empty and its bottom is
/// always [`StateName::Root`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(into = "Stack", try_from = "Stack")]
pub struct LexerState {
    stack: Stack,
}

impl LexerState {
    pub fn new() -> Self {
        let mut stack = Stack::new();
        // Capacity is at least one.
        let _ = stack.push(StateName::Root);
        Self { stack }
    }

    pub fn from_states(states: &[StateName]) -> Result<Self, StateError> {
        let Some((bottom, nested)) = states.split_first() else {
            return Err(StateError::Empty);
        };
        if *bottom != StateName::Root {
            return Err(StateError::MissingRoot);
        }
        if states.len() > MAX_STATE_DEPTH {
            return Err(StateError::TooDeep(states.len()));
        }
        let mut state = Self::new();
        for name in nested {
            if *name == StateName::Root {
                return Err(StateError::NestedRoot);
            }
            state.push(*name);
        }
        Ok(state)
    }

    pub fn current(&self) -> StateName {
        self.stack.last().copied().unwrap_or(StateName::Root)
    }

    pub fn states(&self) -> &[StateName] {
        self.stack.as_slice()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_root(&self) -> bool {
        self.stack.len() <= 1
    }

    /// A push onto a full stack is dropped.
    fn push(&mut self, name: StateName) {
        let _ = self.stack.push(name);
    }

    /// Popping the root state is a no-op.
    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(name) => self.push(name),
            Transition::Pop => self.pop(),
        }
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<LexerState> for Stack {
    fn from(state: LexerState) -> Self {
        state.stack
    }
}

impl TryFrom<Stack> for LexerState {
    type Error = StateError;
    fn try_from(stack: Stack) -> Result<Self, Self::Error> {
        Self::from_states(stack.as_slice())
    }
}

/// Runs a [`RuleTable`] over lines of source.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'t> {
    table: &'t RuleTable,
}

impl<'t> Lexer<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Self { table }
    }

    /// Tokens of `line`, advancing `state` as they are produced. Drain the
    /// iterator to leave `state` where the next line starts.
    pub fn line<'l, 's>(
        &self,
        line: &'l str,
        state: &'s mut LexerState,
    ) -> LineTokens<'t, 'l, 's> {
        LineTokens {
            table: self.table,
            line,
            column: 0,
            state,
            finished: false,
        }
    }

    /// Tokenizes `line` starting from `state` and returns the tokens with
    /// the state the next line starts in.
    pub fn tokenize_line<'l, const TOKEN_CAP: usize>(
        &self,
        line: &'l str,
        state: &LexerState,
    ) -> Result<(Vec<Token<'l>, TOKEN_CAP>, LexerState), TokenizeError> {
        let mut next = state.clone();
        let mut tokens = Vec::new();
        for token in self.line(line, &mut next) {
            tokens
                .push(token)
                .map_err(|_| TokenizeError::TooManyTokens(TOKEN_CAP))?;
        }
        Ok((tokens, next))
    }
}

/// Iterator over the tokens of one line. See [`Lexer::line`].
#[derive(Debug)]
pub struct LineTokens<'t, 'l, 's> {
    table: &'t RuleTable,
    line: &'l str,
    column: usize,
    state: &'s mut LexerState,
    finished: bool,
}

impl<'l> LineTokens<'_, 'l, '_> {
    fn end_of_line(&mut self, input: &Input<'_>) -> Token<'l> {
        self.finished = true;
        let rules = self.table.rules(self.state.current());
        let (kind, transition) = rules
            .iter()
            .find(|rule| rule.pattern.match_at(input) == Some(0))
            .map(|rule| (rule.kind, rule.transition))
            .unwrap_or((TokenKind::EndOfLine, Transition::None));
        self.state.apply(transition);
        Token {
            kind,
            text: "",
            start: self.column,
            end: self.column,
        }
    }
}

impl<'l> Iterator for LineTokens<'_, 'l, '_> {
    type Item = Token<'l>;

    fn next(&mut self) -> Option<Token<'l>> {
        if self.finished {
            return None;
        }
        let input = Input::at(self.line, self.column)?;
        if input.rest.is_empty() {
            return Some(self.end_of_line(&input));
        }

        let rules = self.table.rules(self.state.current());
        // Only the end of the line may be matched with zero width.
        let matched = rules.iter().find_map(|rule| {
            let len = rule.pattern.match_at(&input)?;
            (len > 0).then_some((rule.kind, len, rule.transition))
        });
        let (kind, len, transition) = match matched {
            Some(found) => found,
            None => {
                let len = input.rest.chars().next().map_or(1, char::len_utf8);
                (TokenKind::Unclassified, len, Transition::None)
            }
        };

        let start = self.column;
        let end = start.checked_add(len)?;
        let text = input.rest.get(..len)?;
        self.column = end;
        self.state.apply(transition);
        Some(Token {
            kind,
            text,
            start,
            end,
        })
    }
}

impl core::iter::FusedIterator for LineTokens<'_, '_, '_> {}
