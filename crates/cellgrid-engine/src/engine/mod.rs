//! Formula engine API.
//!
//! - [`Position`], [`Size`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`parse_formula`], [`Formula`] - Arithmetic formulas over cell references
//! - [`Value`], [`FormulaError`] - Computed cell values and error categories
//! - [`format_number`] - Number formatting for display

mod ast;
mod error;
mod format;
mod lexer;
mod parser;
mod position;
mod value;

pub use ast::{BinaryOp, Expr, Resolver, UnaryOp};
pub use error::FormulaParseError;
pub use format::format_number;
pub use parser::{Formula, parse_formula};
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{FormulaError, Value};
