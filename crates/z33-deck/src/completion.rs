use z33_lexer::mnemonics::{DIRECTIVES, MNEMONICS, PREPROCESSOR_DIRECTIVES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Mnemonic,
    Directive,
    Preprocessor,
}

impl CompletionKind {
    pub const fn name(self) -> &'static str {
        match self {
            CompletionKind::Mnemonic => "mnemonic",
            CompletionKind::Directive => "directive",
            CompletionKind::Preprocessor => "preprocessor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub label: &'static str,
    pub kind: CompletionKind,
}

/// The full completion list. It does not depend on where the cursor is.
pub fn completions() -> impl Iterator<Item = Completion> {
    let tagged = |labels: &'static [&'static str], kind: CompletionKind| {
        labels.iter().copied().map(move |label| Completion { label, kind })
    };
    tagged(MNEMONICS, CompletionKind::Mnemonic)
        .chain(tagged(DIRECTIVES, CompletionKind::Directive))
        .chain(tagged(PREPROCESSOR_DIRECTIVES, CompletionKind::Preprocessor))
}
