use wasm_bindgen::prelude::*;

use thiserror_no_std::Error;
use z33_lexer::{Lexer, RuleTable, RuleTableError};

use std::vec::Vec as StdVec;

pub mod completion;
pub mod document;
pub mod highlight;
pub mod style;


use completion::completions;
use document::Document;
use highlight::{decode_state_or_initial, encode_state, highlight_line, HighlightedLine};
use style::{style_for_name, style_of};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    #[error("invalid lexer state")]
    InvalidState,
    #[error("could not encode lexer state")]
    CouldNotEncode,
    #[error("line {line} out of range for {count} lines")]
    LineOutOfRange { line: usize, count: usize },
    #[error("line too long")]
    LineTooLong,
    #[error("invalid rule table: {0}")]
    RuleTable(RuleTableError),
}

impl From<RuleTableError> for DeckError {
    fn from(err: RuleTableError) -> Self {
        DeckError::RuleTable(err)
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);
}

fn deck_error_to_js(err: DeckError) -> JsValue {
    JsValue::from_str(&format!("z33: {}", err))
}

/// Tokens of one line as parallel arrays, plus the state for the next line.
#[wasm_bindgen]
pub struct LineHighlight {
    from: StdVec<u32>,
    to: StdVec<u32>,
    kinds: StdVec<String>,
    classes: StdVec<String>,
    state: StdVec<u8>,
    errors: u32,
}

impl LineHighlight {
    fn from_line(line: HighlightedLine) -> Result<Self, DeckError> {
        let mut errors: u32 = 0;
        for span in line.spans.iter() {
            if span.kind.is_error() {
                errors = errors.saturating_add(1);
            }
        }
        Ok(Self {
            from: line.spans.iter().map(|span| span.from).collect(),
            to: line.spans.iter().map(|span| span.to).collect(),
            kinds: line
                .spans
                .iter()
                .map(|span| span.kind.name().to_string())
                .collect(),
            classes: line
                .spans
                .iter()
                .map(|span| style_of(span.kind).class.to_string())
                .collect(),
            state: encode_state(&line.state)?,
            errors,
        })
    }
}

#[wasm_bindgen]
impl LineHighlight {
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.from.len()
    }

    /// UTF-16 start column of each token.
    pub fn starts(&self) -> StdVec<u32> {
        self.from.clone()
    }

    pub fn ends(&self) -> StdVec<u32> {
        self.to.clone()
    }

    pub fn kinds(&self) -> StdVec<String> {
        self.kinds.clone()
    }

    pub fn classes(&self) -> StdVec<String> {
        self.classes.clone()
    }

    /// Pass this to the next line.
    pub fn state(&self) -> StdVec<u8> {
        self.state.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> u32 {
        self.errors
    }
}

/// Stateless line highlighter. The editor keeps the state bytes of each
/// line and hands them back for the following one.
#[wasm_bindgen]
pub struct Highlighter {
    table: RuleTable,
}

#[wasm_bindgen]
impl Highlighter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Highlighter, JsValue> {
        console_error_panic_hook::set_once();
        let table = RuleTable::new().map_err(|err| deck_error_to_js(err.into()))?;
        Ok(Highlighter { table })
    }

    /// Empty `state` means the first line of a buffer. A state that does
    /// not decode is logged and replaced by the first line state.
    pub fn tokenize(&self, line: &str, state: &[u8]) -> Result<LineHighlight, JsValue> {
        let (state, err) = decode_state_or_initial(state);
        if let Some(err) = err {
            console_log(&format!("z33: {}, restarting from the root state", err));
        }
        let lexer = Lexer::new(&self.table);
        let line = highlight_line(&lexer, line, &state).map_err(deck_error_to_js)?;
        LineHighlight::from_line(line).map_err(deck_error_to_js)
    }

    pub fn initial_state() -> Result<StdVec<u8>, JsValue> {
        encode_state(&Default::default()).map_err(deck_error_to_js)
    }
}

/// A whole buffer kept in sync with the editor through line edits.
#[wasm_bindgen(js_name = Document)]
pub struct DocumentJs {
    inner: Document,
}

#[wasm_bindgen(js_class = Document)]
impl DocumentJs {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Result<DocumentJs, JsValue> {
        console_error_panic_hook::set_once();
        let mut inner = Document::new().map_err(deck_error_to_js)?;
        inner.set_text(text);
        Ok(DocumentJs { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    pub fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
    }

    /// `text` holds the inserted lines, `""` inserts none. Returns the
    /// `[start, end)` range of lines to redraw.
    pub fn replace_lines(
        &mut self,
        start: usize,
        removed: usize,
        text: &str,
    ) -> Result<StdVec<u32>, JsValue> {
        let inserted: StdVec<&str> = text.lines().collect();
        let range = self
            .inner
            .replace_lines(start, removed, &inserted)
            .map_err(deck_error_to_js)?;
        let bounds = self.inner.line_bounds(range).map_err(deck_error_to_js)?;
        Ok(bounds.to_vec())
    }

    pub fn highlight(&self, line: usize) -> Result<LineHighlight, JsValue> {
        let line = self.inner.highlight(line).map_err(deck_error_to_js)?;
        LineHighlight::from_line(line).map_err(deck_error_to_js)
    }
}

/// Every completion label, the same list wherever the cursor is.
#[wasm_bindgen]
pub fn completion_labels() -> StdVec<String> {
    completions().map(|item| item.label.to_string()).collect()
}

/// Category of each entry of [`completion_labels`], in the same order.
#[wasm_bindgen]
pub fn completion_kinds() -> StdVec<String> {
    completions().map(|item| item.kind.name().to_string()).collect()
}

/// Inline CSS for a token kind name as found in [`LineHighlight::kinds`].
#[wasm_bindgen]
pub fn style_for(kind: &str) -> Result<String, JsValue> {
    style_for_name(kind)
        .ok_or_else(|| JsValue::from_str(&format!("z33: unknown token kind {}", kind)))
}
