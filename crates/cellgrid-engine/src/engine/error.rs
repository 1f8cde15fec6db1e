//! Formula parse errors.

use thiserror::Error;

/// Why a formula body could not be parsed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FormulaParseError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of formula")]
    UnexpectedEnd,
}
