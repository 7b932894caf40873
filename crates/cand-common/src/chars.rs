//! Byte classification for C& source text.
//!
//! The accepted alphabet is printable 7-bit ASCII plus the whitespace
//! controls. Every predicate here is total over `u8`; the orchestrator
//! rejects anything for which [`is_valid_source_byte`] is false before
//! the lexer ever sees it.

/// Line feed.
pub fn is_newline(b: u8) -> bool {
    b == b'\n'
}

/// A single space character.
pub fn is_space(b: u8) -> bool {
    b == b' '
}

/// Space, newline, horizontal tab, carriage return, form feed or
/// vertical tab.
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\t' | b'\r' | b'\x0c' | b'\x0b')
}

pub fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

pub fn is_underscore(b: u8) -> bool {
    b == b'_'
}

/// Identifier continuation: letter, digit or underscore.
pub fn is_alnum_underscore(b: u8) -> bool {
    is_alpha(b) || is_digit(b) || is_underscore(b)
}

/// Identifier start: letter or underscore.
pub fn is_ident_start(b: u8) -> bool {
    is_alpha(b) || is_underscore(b)
}

/// Printable ASCII that is neither alphanumeric nor a space.
pub fn is_punctuator(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Whether a byte may appear in C& source at all.
pub fn is_valid_source_byte(b: u8) -> bool {
    (0x20..=0x7e).contains(&b) || is_whitespace(b)
}
