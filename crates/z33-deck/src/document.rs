use core::ops::Range;

use z33_lexer::{Lexer, LexerState, RuleTable};

use crate::highlight::{highlight_line, HighlightedLine};
use crate::DeckError;

struct Line {
    text: String,
    /// State the next line starts in.
    end_state: LexerState,
}

/// Lines of one editor buffer with the lexer state at the end of each.
///
/// Edits re-lex from the first touched line and stop as soon as a line
/// ends in the state it ended in before the edit, since every later line
/// would lex the same way.
pub struct Document {
    table: RuleTable,
    lines: Vec<Line>,
}

impl Document {
    pub fn new() -> Result<Self, DeckError> {
        Ok(Self {
            table: RuleTable::new()?,
            lines: Vec::new(),
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }

    /// State `index` starts in.
    pub fn start_state(&self, index: usize) -> Result<LexerState, DeckError> {
        if index > self.lines.len() {
            return Err(self.out_of_range(index));
        }
        let state = match index.checked_sub(1) {
            Some(previous) => self
                .lines
                .get(previous)
                .map(|line| line.end_state.clone())
                .unwrap_or_default(),
            None => LexerState::new(),
        };
        Ok(state)
    }

    pub fn end_state(&self, index: usize) -> Result<&LexerState, DeckError> {
        self.lines
            .get(index)
            .map(|line| &line.end_state)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Replaces the whole buffer.
    pub fn set_text(&mut self, text: &str) {
        let lexer = Lexer::new(&self.table);
        let mut state = LexerState::new();
        self.lines = text
            .lines()
            .map(|text| {
                lexer.line(text, &mut state).for_each(drop);
                Line {
                    text: text.to_string(),
                    end_state: state.clone(),
                }
            })
            .collect();
    }

    /// Replaces `removed` lines at `start` with `inserted` and re-lexes what
    /// the edit can have changed. Returns the lines whose tokens may differ.
    pub fn replace_lines(
        &mut self,
        start: usize,
        removed: usize,
        inserted: &[&str],
    ) -> Result<Range<usize>, DeckError> {
        let end = start.checked_add(removed).ok_or(DeckError::LineOutOfRange {
            line: start,
            count: self.lines.len(),
        })?;
        if end > self.lines.len() {
            return Err(self.out_of_range(end));
        }

        let mut state = self.start_state(start)?;
        let edited_end = start
            .checked_add(inserted.len())
            .ok_or(DeckError::LineOutOfRange {
                line: start,
                count: self.lines.len(),
            })?;
        let replacement = inserted.iter().map(|text| Line {
            text: text.to_string(),
            end_state: LexerState::new(),
        });
        self.lines.splice(start..end, replacement).for_each(drop);

        let lexer = Lexer::new(&self.table);
        let mut relexed_end = start;
        for (index, line) in self.lines.iter_mut().enumerate().skip(start) {
            lexer.line(&line.text, &mut state).for_each(drop);
            relexed_end = index.saturating_add(1);
            let settled = index >= edited_end && line.end_state == state;
            line.end_state = state.clone();
            if settled {
                break;
            }
        }
        Ok(start..relexed_end)
    }

    /// Tokens of one line, with UTF-16 columns.
    pub fn highlight(&self, index: usize) -> Result<HighlightedLine, DeckError> {
        let text = self.line(index).ok_or_else(|| self.out_of_range(index))?;
        let state = self.start_state(index)?;
        highlight_line(&Lexer::new(&self.table), text, &state)
    }

    /// `range` as `[start, end)` line numbers small enough for JS.
    pub fn line_bounds(&self, range: Range<usize>) -> Result<[u32; 2], DeckError> {
        let bound = |line: usize| u32::try_from(line).map_err(|_| self.out_of_range(line));
        Ok([bound(range.start)?, bound(range.end)?])
    }

    fn out_of_range(&self, line: usize) -> DeckError {
        DeckError::LineOutOfRange {
            line,
            count: self.lines.len(),
        }
    }
}
