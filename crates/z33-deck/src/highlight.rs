use postcard::{from_bytes, to_vec};
use z33_lexer::{Lexer, LexerState, Token, TokenKind};

use crate::DeckError;

/// Upper bound of an encoded [`LexerState`]: a length and one byte per state.
pub const STATE_BYTES_MAX: usize = 16;

/// A token with UTF-16 columns, the unit JS editors count in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: u32,
    pub to: u32,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLine {
    pub spans: Vec<Span>,
    pub state: LexerState,
}

pub fn encode_state(state: &LexerState) -> Result<Vec<u8>, DeckError> {
    let bytes =
        to_vec::<LexerState, STATE_BYTES_MAX>(state).map_err(|_| DeckError::CouldNotEncode)?;
    Ok(bytes.to_vec())
}

/// Empty input is the state of the first line.
pub fn decode_state(bytes: &[u8]) -> Result<LexerState, DeckError> {
    if bytes.is_empty() {
        return Ok(LexerState::new());
    }
    from_bytes(bytes).map_err(|_| DeckError::InvalidState)
}

/// Like [`decode_state`], but bytes that do not decode restart from the
/// first line state. The error is handed back so the caller can report it.
pub fn decode_state_or_initial(bytes: &[u8]) -> (LexerState, Option<DeckError>) {
    match decode_state(bytes) {
        Ok(state) => (state, None),
        Err(err) => (LexerState::new(), Some(err)),
    }
}

fn utf16_len(text: &str) -> Result<u32, DeckError> {
    u32::try_from(text.encode_utf16().count()).map_err(|_| DeckError::LineTooLong)
}

/// Converts byte columns to UTF-16 columns.
pub fn spans<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Result<Vec<Span>, DeckError> {
    let mut column: u32 = 0;
    let mut spans = Vec::new();
    for token in tokens {
        let to = column
            .checked_add(utf16_len(token.text)?)
            .ok_or(DeckError::LineTooLong)?;
        spans.push(Span {
            from: column,
            to,
            kind: token.kind,
        });
        column = to;
    }
    Ok(spans)
}

pub fn highlight_line(
    lexer: &Lexer<'_>,
    line: &str,
    state: &LexerState,
) -> Result<HighlightedLine, DeckError> {
    let mut state = state.clone();
    let spans = spans(lexer.line(line, &mut state))?;
    Ok(HighlightedLine { spans, state })
}
