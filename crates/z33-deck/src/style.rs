use z33_lexer::TokenKind;

/// How the editor decorates one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub class: &'static str,
    pub color: Option<&'static str>,
    pub italic: bool,
    pub underline: bool,
}

const fn plain(class: &'static str) -> Style {
    Style {
        class,
        color: None,
        italic: false,
        underline: false,
    }
}

const fn colored(class: &'static str, color: &'static str) -> Style {
    Style {
        class,
        color: Some(color),
        italic: false,
        underline: false,
    }
}

const ERROR_COLOR: &str = "#ff5555";

pub const fn style_of(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Command => colored("z33-command", "#c678dd"),
        TokenKind::Register => colored("z33-register", "#e06c75"),
        TokenKind::Label => colored("z33-label", "#61afef"),
        TokenKind::Macro => colored("z33-macro", "#e5c07b"),
        TokenKind::Number => colored("z33-number", "#d19a66"),
        TokenKind::Comment => Style {
            italic: true,
            ..colored("z33-comment", "#7f848e")
        },
        TokenKind::Operator => colored("z33-operator", "#56b6c2"),
        TokenKind::EndOfLine => plain("z33-eol"),
        TokenKind::Error => Style {
            underline: true,
            ..colored("z33-error", ERROR_COLOR)
        },
        TokenKind::ErrorMissingComma => Style {
            underline: true,
            ..colored("z33-error z33-missing-comma", ERROR_COLOR)
        },
        TokenKind::Whitespace => plain("z33-whitespace"),
        TokenKind::Unclassified => plain("z33-text"),
    }
}

/// Inline CSS for a kind name, `None` when no kind has that name.
pub fn style_for_name(name: &str) -> Option<String> {
    TokenKind::from_name(name).map(css_of)
}

/// Inline CSS for a kind, empty for undecorated kinds.
pub fn css_of(kind: TokenKind) -> String {
    let style = style_of(kind);
    let mut css = String::new();
    if let Some(color) = style.color {
        css.push_str("color: ");
        css.push_str(color);
        css.push(';');
    }
    if style.italic {
        css.push_str("font-style: italic;");
    }
    if style.underline {
        css.push_str("text-decoration: underline wavy;");
    }
    css
}
