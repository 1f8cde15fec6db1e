//! cellgrid-core - reactive sheet model.
//!
//! A [`Sheet`] owns every cell, keeps the dependency edges between formula
//! cells symmetric and acyclic, and invalidates cached values along those
//! edges on every mutation.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::{Cell, CellView, Content, ESCAPE_SIGN, FORMULA_SIGN, Sheet, SheetOptions};

pub use cellgrid_engine::engine::{FormulaError, Position, Size, Value};
