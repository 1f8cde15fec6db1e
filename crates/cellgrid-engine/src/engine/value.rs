//! Cell values and evaluation-time error categories.

use std::fmt;
use thiserror::Error;

/// An error produced while evaluating a formula.
///
/// These are ordinary values from the sheet's point of view: they are cached,
/// flow into dependent formulas and print as their code.
#[derive(Clone, Copy, Debug, Error, Eq, Hash, PartialEq)]
pub enum FormulaError {
    /// A referenced position lies outside the grid.
    #[error("#REF!")]
    Ref,
    /// Text that is not a number was used as an operand.
    #[error("#VALUE!")]
    Value,
    /// Division by zero or any other non-finite arithmetic result.
    #[error("#DIV/0!")]
    Div0,
}

impl FormulaError {
    /// The short code this category prints as.
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#DIV/0!",
        }
    }
}

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Value {
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Coerce this value to a formula operand.
    ///
    /// Empty text counts as zero. Other text must read as a number (leading
    /// whitespace allowed, nothing after it), otherwise it is `#VALUE!`.
    pub fn to_operand(&self) -> Result<f64, FormulaError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Error(e) => Err(*e),
            Value::Text(s) if s.is_empty() => Ok(0.0),
            Value::Text(s) => parse_number(s).ok_or(FormulaError::Value),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let starts_numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    if !starts_numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<FormulaError> for Value {
    fn from(e: FormulaError) -> Self {
        Value::Error(e)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&super::format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => f.write_str(e.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_operands() {
        assert_eq!(Value::empty().to_operand(), Ok(0.0));
        assert_eq!(Value::Text("42".into()).to_operand(), Ok(42.0));
        assert_eq!(Value::Text("  -1.5".into()).to_operand(), Ok(-1.5));
        assert_eq!(Value::Text("3 ".into()).to_operand(), Err(FormulaError::Value));
        assert_eq!(Value::Text("abc".into()).to_operand(), Err(FormulaError::Value));
        assert_eq!(Value::Text("inf".into()).to_operand(), Err(FormulaError::Value));
    }

    #[test]
    fn test_error_operand_propagates_category() {
        assert_eq!(
            Value::Error(FormulaError::Ref).to_operand(),
            Err(FormulaError::Ref)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::Text("hi".into()).to_string(), "hi");
        assert_eq!(Value::Error(FormulaError::Div0).to_string(), "#DIV/0!");
    }
}
