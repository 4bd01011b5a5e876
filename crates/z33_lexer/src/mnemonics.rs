//! Vocabulary of the Z33 assembler.

/// Instruction mnemonics, sorted.
pub const MNEMONICS: &[&str] = &[
    "add", "and", "call", "cmp", "div", "fas", "in", "jeq", "jge", "jgt", "jle", "jlt", "jmp",
    "jne", "ld", "mul", "neg", "nop", "not", "or", "out", "pop", "push", "reset", "rti", "rtn",
    "shl", "shr", "st", "sub", "swap", "trap", "xor",
];

/// Assembler directives, written with their leading `.`.
pub const DIRECTIVES: &[&str] = &[".addr", ".space", ".string", ".word"];

/// Preprocessor directives, written with their leading `#`.
pub const PREPROCESSOR_DIRECTIVES: &[&str] = &[
    "#define", "#undefine", "#include", "#if", "#elif", "#else", "#endif", "#error",
];

/// Register names without the `%` prefix.
pub const REGISTERS: &[&str] = &["a", "b", "sp", "pc"];

pub fn is_mnemonic(word: &str) -> bool {
    MNEMONICS.binary_search(&word).is_ok()
}

pub fn is_register(name: &str) -> bool {
    REGISTERS.contains(&name)
}
