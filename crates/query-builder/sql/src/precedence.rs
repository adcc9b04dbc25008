//! Binding strength of expressions.
//!
//! A higher number binds looser. A child is parenthesized by its parent when
//! its precedence is strictly greater than the parent's.

/// Constants, columns and other atoms.
pub const DEFAULT: u8 = 0;
/// Function calls.
pub const FUNCTION: u8 = 1;
pub const MULTIPLICATIVE: u8 = 3;
pub const ADDITIVE: u8 = 4;
/// `>` and `<`.
pub const RELATIONAL: u8 = 6;
pub const EQUALITY: u8 = 7;
pub const IS_NULL: u8 = 8;
pub const NOT: u8 = 10;
pub const AND: u8 = 11;
/// Sub-selects and `IN` predicates.
pub const STATEMENT: u8 = 16;
/// Bare table and join references.
pub const VIEW: u8 = 17;
