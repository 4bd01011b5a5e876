use heapless::Vec;
use thiserror_no_std::Error;

use crate::mnemonics::{is_mnemonic, is_register, REGISTERS};
use crate::{StateName, TokenKind};


/// Capacity of the flattened rule list of a single state.
pub const RULES_PER_STATE: usize = 24;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("state {0:?} has too many rules once fragments are spliced in")]
    StateTooLarge(StateName),
}

/// What happens to the state stack after a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(StateName),
    Pop,
}

/// Where a mnemonic may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    LineStart,
    AfterBlank,
}

/// The operand shapes of a missing separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
    /// `%a %b`
    WordWord,
    /// `[%a] %b`
    BracketWord,
    /// `%a [%b]`
    WordBracket,
}

/// Text a rule is matched against: everything left of the cursor and
/// everything from the cursor to the end of the line.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    pub before: &'a str,
    pub rest: &'a str,
}

impl<'a> Input<'a> {
    pub fn at(line: &'a str, column: usize) -> Option<Self> {
        let (before, rest) = line.split_at_checked(column)?;
        Some(Self { before, rest })
    }
}

/// Tagged pattern variants. Every variant reports the byte length it
/// matched at the start of `Input::rest`; only [`Pattern::EndOfLine`]
/// may match zero bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    EndOfLine,
    Literal(&'static str),
    /// Maximal run of decimal digits.
    Digits,
    /// `//` up to the end of the line.
    LineComment,
    /// Run of spaces and tabs.
    Blank,
    /// Instruction mnemonic followed by a non word character.
    Mnemonic(Anchor),
    /// Word immediately followed by `:`.
    Label,
    /// `#word` or `.word`.
    Macro,
    /// `%a`, `%b`, `%sp` or `%pc` as a whole word.
    Register,
    /// A register name with extra word characters, `%ab`, `%spx`.
    RegisterOverrun,
    /// `%` then `prefix` then a word character that is not `expected`.
    RegisterNearMiss { prefix: u8, expected: u8 },
    /// `%` then a word character that starts no register name.
    RegisterUnknown,
    /// `%`, `%s` or `%p` with nothing following.
    RegisterTruncated,
    MissingComma(Operands),
    /// A character not allowed in an index expression, up to the end of the line.
    IndexGarbage,
    /// Maximal run of word characters, such as a symbol operand.
    Word,
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

fn is_bad_separator(byte: u8) -> bool {
    !(is_word(byte) || byte == b',' || byte == b'/')
}

fn run(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|byte| pred(**byte)).count()
}

fn non_empty(len: usize) -> Option<usize> {
    if len == 0 { None } else { Some(len) }
}

/// Optional `%` followed by at least one word character.
fn word_like(bytes: &[u8]) -> Option<usize> {
    let sigil = usize::from(bytes.first() == Some(&b'%'));
    let word = non_empty(run(bytes.get(sigil..)?, is_word))?;
    sigil.checked_add(word)
}

/// `[`, anything but `]`, then `]`.
fn bracketed(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let inner = run(bytes.get(1..)?, |byte| byte != b']');
    if bytes.get(inner.checked_add(1)?) != Some(&b']') {
        return None;
    }
    inner.checked_add(2)
}

/// Name after a `%` sigil, or `None` when there is no sigil.
fn register_name(rest: &str) -> Option<&str> {
    let name = rest.strip_prefix('%')?;
    let len = run(name.as_bytes(), is_word);
    name.get(..len)
}

fn sigiled(name: &str) -> Option<usize> {
    name.len().checked_add(1)
}

fn missing_comma(shape: Operands, bytes: &[u8]) -> Option<usize> {
    match shape {
        Operands::WordWord => {
            let first = word_like(bytes)?;
            let after = bytes.get(first..)?;
            let separator = non_empty(run(after, is_bad_separator))?;
            let second = non_empty(run(after.get(separator..)?, is_word))?;
            first.checked_add(separator)?.checked_add(second)
        }
        Operands::BracketWord => {
            let first = bracketed(bytes)?;
            let after = bytes.get(first..)?;
            let separator = non_empty(run(after, is_bad_separator))?;
            let second = non_empty(run(after.get(separator..)?, is_word))?;
            first.checked_add(separator)?.checked_add(second)
        }
        Operands::WordBracket => {
            let first = word_like(bytes)?;
            let after = bytes.get(first..)?;
            let separator = run(after, is_bad_separator);
            // `[` is itself a bad separator, so try the rightmost `[`
            // inside the separator run first.
            let found = (1..=separator).rev().find_map(|split| {
                let bracket = bracketed(after.get(split..)?)?;
                split.checked_add(bracket)
            })?;
            first.checked_add(found)
        }
    }
}

impl Pattern {
    pub fn match_at(&self, input: &Input<'_>) -> Option<usize> {
        let bytes = input.rest.as_bytes();
        match *self {
            Pattern::EndOfLine => input.rest.is_empty().then_some(0),
            Pattern::Literal(text) => input.rest.starts_with(text).then_some(text.len()),
            Pattern::Digits => non_empty(run(bytes, |byte| byte.is_ascii_digit())),
            Pattern::LineComment => input.rest.starts_with("//").then_some(bytes.len()),
            Pattern::Blank => non_empty(run(bytes, is_blank)),
            Pattern::Mnemonic(anchor) => {
                let anchored = match anchor {
                    Anchor::LineStart => input.before.is_empty(),
                    Anchor::AfterBlank => input.before.bytes().last().is_some_and(is_blank),
                };
                if !anchored {
                    return None;
                }
                let len = non_empty(run(bytes, is_word))?;
                if bytes.get(len) == Some(&b':') {
                    return None;
                }
                let word = input.rest.get(..len)?;
                is_mnemonic(word).then_some(len)
            }
            Pattern::Label => {
                let len = non_empty(run(bytes, is_word))?;
                if bytes.get(len) != Some(&b':') {
                    return None;
                }
                len.checked_add(1)
            }
            Pattern::Macro => {
                if !matches!(bytes.first(), Some(b'#') | Some(b'.')) {
                    return None;
                }
                let len = non_empty(run(bytes.get(1..)?, is_word))?;
                len.checked_add(1)
            }
            Pattern::Register => {
                let name = register_name(input.rest)?;
                if is_register(name) { sigiled(name) } else { None }
            }
            Pattern::RegisterOverrun => {
                let name = register_name(input.rest)?;
                let overruns = REGISTERS
                    .iter()
                    .any(|register| name.len() > register.len() && name.starts_with(register));
                if overruns { sigiled(name) } else { None }
            }
            Pattern::RegisterNearMiss { prefix, expected } => {
                let name = register_name(input.rest)?;
                match name.as_bytes() {
                    [first, second, ..] if *first == prefix && *second != expected => {
                        sigiled(name)
                    }
                    _ => None,
                }
            }
            Pattern::RegisterUnknown => {
                let name = register_name(input.rest)?;
                match name.as_bytes().first() {
                    Some(first) if !matches!(first, b'a' | b'b' | b's' | b'p') => sigiled(name),
                    _ => None,
                }
            }
            Pattern::RegisterTruncated => {
                let name = register_name(input.rest)?;
                if matches!(name, "" | "s" | "p") { sigiled(name) } else { None }
            }
            Pattern::MissingComma(shape) => missing_comma(shape, bytes),
            Pattern::Word => non_empty(run(bytes, is_word)),
            Pattern::IndexGarbage => {
                let first = input.rest.chars().next()?;
                let allowed = first.is_ascii_alphanumeric()
                    || matches!(first, '-' | '+' | '%' | ' ' | '\t' | ']');
                if allowed { None } else { Some(bytes.len()) }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub kind: TokenKind,
    pub transition: Transition,
}

impl Rule {
    pub const fn new(pattern: Pattern, kind: TokenKind) -> Self {
        Self {
            pattern,
            kind,
            transition: Transition::None,
        }
    }

    pub const fn push(self, state: StateName) -> Self {
        Self {
            transition: Transition::Push(state),
            ..self
        }
    }

    pub const fn pop(self) -> Self {
        Self {
            transition: Transition::Pop,
            ..self
        }
    }
}

/// Reusable rule groups. They are spliced into states and never put on
/// the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Constants,
    Comments,
    Registers,
    /// Words no other rule claims, kept as one span.
    Words,
    Blank,
}

const CONSTANTS: &[Rule] = &[Rule::new(Pattern::Digits, TokenKind::Number)];

const COMMENTS: &[Rule] = &[Rule::new(Pattern::LineComment, TokenKind::Comment)];

// Exact names come first, the near-miss rules would claim them otherwise.
const REGISTER_RULES: &[Rule] = &[
    Rule::new(Pattern::Register, TokenKind::Register),
    Rule::new(Pattern::RegisterOverrun, TokenKind::Error),
    Rule::new(
        Pattern::RegisterNearMiss {
            prefix: b's',
            expected: b'p',
        },
        TokenKind::Error,
    ),
    Rule::new(
        Pattern::RegisterNearMiss {
            prefix: b'p',
            expected: b'c',
        },
        TokenKind::Error,
    ),
    Rule::new(Pattern::RegisterUnknown, TokenKind::Error),
    Rule::new(Pattern::RegisterTruncated, TokenKind::Error),
];

const WORDS: &[Rule] = &[Rule::new(Pattern::Word, TokenKind::Unclassified)];

const BLANK: &[Rule] = &[Rule::new(Pattern::Blank, TokenKind::Whitespace)];

impl Fragment {
    pub const fn rules(self) -> &'static [Rule] {
        match self {
            Fragment::Constants => CONSTANTS,
            Fragment::Comments => COMMENTS,
            Fragment::Registers => REGISTER_RULES,
            Fragment::Words => WORDS,
            Fragment::Blank => BLANK,
        }
    }
}

/// One line of a state declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Rule(Rule),
    Include(Fragment),
}

const fn mnemonic_entry(anchor: Anchor) -> Entry {
    Entry::Rule(Rule::new(Pattern::Mnemonic(anchor), TokenKind::Command).push(StateName::Command))
}

const fn missing_comma_entry(shape: Operands) -> Entry {
    Entry::Rule(Rule::new(Pattern::MissingComma(shape), TokenKind::ErrorMissingComma).pop())
}

pub const ROOT: &[Entry] = &[
    mnemonic_entry(Anchor::AfterBlank),
    mnemonic_entry(Anchor::LineStart),
    Entry::Rule(Rule::new(Pattern::Label, TokenKind::Label)),
    Entry::Rule(Rule::new(Pattern::Macro, TokenKind::Macro)),
    Entry::Include(Fragment::Constants),
    Entry::Include(Fragment::Comments),
    Entry::Include(Fragment::Words),
    Entry::Include(Fragment::Blank),
];

// The missing comma rules must stay ahead of `[` and `,`.
pub const COMMAND: &[Entry] = &[
    Entry::Rule(Rule::new(Pattern::EndOfLine, TokenKind::EndOfLine).pop()),
    missing_comma_entry(Operands::WordWord),
    missing_comma_entry(Operands::BracketWord),
    missing_comma_entry(Operands::WordBracket),
    Entry::Rule(Rule::new(Pattern::Literal("["), TokenKind::Operator).push(StateName::Idx)),
    Entry::Rule(Rule::new(Pattern::Literal(","), TokenKind::Operator)),
    Entry::Include(Fragment::Constants),
    Entry::Include(Fragment::Comments),
    Entry::Include(Fragment::Registers),
    Entry::Include(Fragment::Words),
    Entry::Include(Fragment::Blank),
];

pub const IDX: &[Entry] = &[
    Entry::Rule(Rule::new(Pattern::Literal("]"), TokenKind::Operator).pop()),
    Entry::Rule(Rule::new(Pattern::IndexGarbage, TokenKind::Error).pop()),
    Entry::Include(Fragment::Constants),
    Entry::Include(Fragment::Registers),
    Entry::Include(Fragment::Words),
    Entry::Include(Fragment::Blank),
];

type StateRules = Vec<Rule, RULES_PER_STATE>;

/// Flattened, read-only rules of every state. Build it once and share it
/// between all lexers.
#[derive(Debug, Clone)]
pub struct RuleTable {
    states: [StateRules; StateName::VARIANT_COUNT],
}

impl RuleTable {
    /// The Z33 rule table.
    pub fn new() -> Result<Self, RuleTableError> {
        Self::from_entries(ROOT, COMMAND, IDX)
    }

    pub fn from_entries(
        root: &[Entry],
        command: &[Entry],
        idx: &[Entry],
    ) -> Result<Self, RuleTableError> {
        Ok(Self {
            states: [
                splice(StateName::Root, root)?,
                splice(StateName::Command, command)?,
                splice(StateName::Idx, idx)?,
            ],
        })
    }

    pub fn rules(&self, state: StateName) -> &[Rule] {
        self.states
            .get(state.index())
            .map(|rules| rules.as_slice())
            .unwrap_or(&[])
    }
}

fn splice(state: StateName, entries: &[Entry]) -> Result<StateRules, RuleTableError> {
    let mut rules = StateRules::new();
    for entry in entries {
        let group = match entry {
            Entry::Rule(rule) => core::slice::from_ref(rule),
            Entry::Include(fragment) => fragment.rules(),
        };
        rules
            .extend_from_slice(group)
            .map_err(|_| RuleTableError::StateTooLarge(state))?;
    }
    Ok(rules)
}
