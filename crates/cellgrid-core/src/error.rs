//! Error types for the sheet model.

use cellgrid_engine::engine::{FormulaParseError, Position};
use thiserror::Error;

/// Structural errors from mutating a sheet. The sheet is unchanged when any
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("invalid position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("malformed formula: {0}")]
    Formula(#[from] FormulaParseError),

    #[error("circular dependency: {}", render_path(.path))]
    CircularDependency { cell: Position, path: Vec<Position> },
}

fn render_path(path: &[Position]) -> String {
    path.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;
