//! Operand helpers shared by the graph builder, rules and categorizer.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid numeric literal regex")
});

/// True for integer, decimal and scientific-notation literals.
pub fn is_numeric_literal(s: &str) -> bool {
    NUMERIC_LITERAL.is_match(s.trim())
}

/// True when an operand names a tag: not empty, not a number, not the `?`
/// placeholder and not a quoted string.
pub fn is_tag_operand(s: &str) -> bool {
    let s = s.trim();
    !(s.is_empty()
        || s == "?"
        || s.starts_with('\'')
        || s.starts_with('"')
        || is_numeric_literal(s))
}
