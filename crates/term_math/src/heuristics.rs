//! Content heuristics that switch layout strategies.
//!
//! These look at already-flattened box text rather than at markup, so a
//! summation sign reached through nested rows is detected the same way as
//! a bare `<mo>∑</mo>`.

use crate::model::symbols;

/// Operators that get one blank on each side
const BINARY_OPERATORS: &[&str] = &["=", "+", "-", "*", "/", "≠"];

/// Function-like operators written flush against their argument
const PREFIX_FUNCTIONS: &[&str] = &["log", "ln", "sin", "cos", "tan", "exp"];

/// Does the text contain the summation glyph?
pub fn is_summation(text: &str) -> bool {
    text.contains(symbols::SUM)
}

/// Does a table row read as the "where ..." clause of a definition?
pub fn has_where_clause(text: &str) -> bool {
    text.to_lowercase().contains("where")
}

/// Binary operators are padded with a blank on both sides
pub fn is_binary_operator(text: &str) -> bool {
    BINARY_OPERATORS.contains(&text)
}

/// Function names such as `log` or `sin` that take no padding
pub fn is_prefix_function(text: &str) -> bool {
    PREFIX_FUNCTIONS.contains(&text)
}
