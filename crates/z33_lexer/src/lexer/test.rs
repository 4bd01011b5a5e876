use super::*;
use crate::rules::{Entry, Fragment, Pattern, Rule};
extern crate std;

#[test]
fn new_state_is_root() {
    let state = LexerState::new();
    assert_eq!(state.states(), &[StateName::Root]);
    assert_eq!(state.current(), StateName::Root);
    assert!(state.is_root());
    assert_eq!(state, LexerState::default());
}

#[test]
fn pop_never_removes_root() {
    let mut state = LexerState::new();
    state.apply(Transition::Push(StateName::Command));
    state.apply(Transition::Push(StateName::Idx));
    assert_eq!(state.depth(), 3);
    for _ in 0..5 {
        state.apply(Transition::Pop);
    }
    assert_eq!(state.states(), &[StateName::Root]);
}

#[test]
fn push_on_full_stack_is_dropped() {
    let mut state = LexerState::new();
    for _ in 0..MAX_STATE_DEPTH + 3 {
        state.apply(Transition::Push(StateName::Command));
    }
    assert_eq!(state.depth(), MAX_STATE_DEPTH);
    assert_eq!(state.current(), StateName::Command);
}

#[test]
fn from_states_checks_the_stack() -> Result<(), StateError> {
    let state = LexerState::from_states(&[StateName::Root, StateName::Command, StateName::Idx])?;
    assert_eq!(state.current(), StateName::Idx);
    assert_eq!(LexerState::from_states(&[]), Err(StateError::Empty));
    assert_eq!(
        LexerState::from_states(&[StateName::Command]),
        Err(StateError::MissingRoot)
    );
    assert_eq!(
        LexerState::from_states(&[StateName::Root, StateName::Root]),
        Err(StateError::NestedRoot)
    );

    let mut deep = [StateName::Command; MAX_STATE_DEPTH + 1];
    deep[0] = StateName::Root;
    assert_eq!(LexerState::from_states(&deep), Err(StateError::TooDeep(MAX_STATE_DEPTH + 1)));
    let full = LexerState::from_states(&deep[..MAX_STATE_DEPTH])?;
    assert_eq!(full.depth(), MAX_STATE_DEPTH);
    Ok(())
}

#[test]
fn state_survives_postcard() -> Result<(), StateError> {
    let state = LexerState::from_states(&[StateName::Root, StateName::Command, StateName::Idx])?;
    let bytes = postcard::to_vec::<_, 16>(&state).unwrap();
    let decoded: LexerState = postcard::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, state);
    Ok(())
}

#[test]
fn decoding_rejects_stack_without_root() {
    let mut stack = Stack::new();
    stack.push(StateName::Idx).unwrap();
    let bytes = postcard::to_vec::<_, 16>(&stack).unwrap();
    assert!(postcard::from_bytes::<LexerState>(&bytes).is_err());
}

#[test]
fn tokenize_line_returns_next_state() -> Result<(), TokenizeError> {
    let table = RuleTable::new().unwrap();
    let lexer = Lexer::new(&table);
    let start = LexerState::new();

    let (tokens, next) = lexer.tokenize_line::<16>("ld [%a", &start)?;
    assert_eq!(next.states(), &[StateName::Root, StateName::Command, StateName::Idx]);
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EndOfLine));
    assert!(start.is_root());

    let (tokens, next) = lexer.tokenize_line::<16>("+4], %b", &next)?;
    assert!(next.is_root());
    let kinds: std::vec::Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Unclassified,
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Operator,
            TokenKind::Whitespace,
            TokenKind::Register,
            TokenKind::EndOfLine,
        ]
    );
    Ok(())
}

#[test]
fn token_capacity_is_reported() {
    let table = RuleTable::new().unwrap();
    let lexer = Lexer::new(&table);
    let start = LexerState::from_states(&[StateName::Root, StateName::Command]).unwrap();
    let result = lexer.tokenize_line::<2>("%a, %b", &start);
    assert_eq!(result.err(), Some(TokenizeError::TooManyTokens(2)));
    assert_eq!(start.current(), StateName::Command);
}

#[test]
fn unmatched_input_advances_one_char() {
    let table = RuleTable::new().unwrap();
    let lexer = Lexer::new(&table);
    let mut state = LexerState::new();
    let tokens: std::vec::Vec<Token<'_>> = lexer.line("é=", &mut state).collect();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].text, "é");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 2));
    assert_eq!(tokens[1].text, "=");
    assert_eq!(tokens[1].kind, TokenKind::Unclassified);
    assert_eq!((tokens[2].start, tokens[2].end), (3, 3));
}

#[test]
fn pop_at_root_keeps_root() {
    let root = [
        Entry::Rule(Rule::new(Pattern::Literal("]"), TokenKind::Operator).pop()),
        Entry::Include(Fragment::Blank),
    ];
    let table = RuleTable::from_entries(&root, &[], &[]).unwrap();
    let lexer = Lexer::new(&table);
    let mut state = LexerState::new();
    let count = lexer.line("] ] ]", &mut state).count();
    assert_eq!(count, 6);
    assert!(state.is_root());
}

#[test]
fn end_of_line_without_rule_keeps_state() {
    let table = RuleTable::new().unwrap();
    let lexer = Lexer::new(&table);
    let mut state =
        LexerState::from_states(&[StateName::Root, StateName::Command, StateName::Idx]).unwrap();
    let tokens: std::vec::Vec<Token<'_>> = lexer.line("", &mut state).collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EndOfLine);
    assert_eq!(state.current(), StateName::Idx);
}
